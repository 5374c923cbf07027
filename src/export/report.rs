//! HTML reports in two levels of detail.

use std::fmt::Write;

use super::html::{close_document, escape, open_document, or_dash, write_flows, write_framing};
use super::ReportMode;
use crate::document::{DeipCategory, ProcessImprovement, ProcessNode};

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "<section>\n<h2>{}</h2>", heading);
    if items.is_empty() {
        out.push_str("<p class=\"muted\">-</p>\n");
    } else {
        out.push_str("<ul>\n");
        for item in items {
            let _ = writeln!(out, "<li>{}</li>", escape(item));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
}

fn write_node(out: &mut String, heading: &str, node: &ProcessNode) {
    let _ = writeln!(out, "<section>\n<h2>{}</h2>", heading);
    if node.cards.is_empty() {
        out.push_str("<p class=\"muted\">-</p>\n");
    }
    for card in &node.cards {
        let _ = writeln!(
            out,
            "<p><strong>{}</strong><br>{}</p>",
            or_dash(&card.title),
            or_dash(&card.text)
        );
    }
    out.push_str("</section>\n");
}

fn write_framing_text(out: &mut String, doc: &ProcessImprovement) {
    out.push_str("<section>\n");
    let _ = writeln!(
        out,
        "<p class=\"label\">Justificativa</p><p>{}</p>\n<p class=\"label\">Objetivo</p><p>{}</p>",
        or_dash(&doc.justification),
        or_dash(&doc.objective)
    );
    out.push_str("</section>\n");
}

fn write_deip(out: &mut String, doc: &ProcessImprovement) {
    out.push_str("<section>\n<h2>DEIP</h2>\n");
    let mut categories: Vec<DeipCategory> = DeipCategory::KNOWN.to_vec();
    for item in &doc.deip_items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    for category in &categories {
        let items = doc.deip_items_by_category(category);
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "<h3>{}</h3>\n<ul>", escape(category.label()));
        for item in items {
            let marker = if item.attention { " (!)" } else { "" };
            let _ = writeln!(
                out,
                "<li><strong>{}{}</strong> {}</li>",
                or_dash(&item.title),
                marker,
                escape(&item.description)
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
}

fn write_deliverables(out: &mut String, doc: &ProcessImprovement) {
    out.push_str("<section>\n<h2>Entregas</h2>\n");
    for deliverable in &doc.deliverables {
        let _ = writeln!(
            out,
            "<h3>{}</h3>\n<p>{}</p>",
            or_dash(&deliverable.title),
            or_dash(&deliverable.description)
        );
        let linked = doc.linked_stories(deliverable);
        if linked.is_empty() {
            continue;
        }
        out.push_str("<ul>\n");
        for found in linked {
            let _ = writeln!(
                out,
                "<li>{} / {}: {}</li>",
                or_dash(&found.step.name),
                or_dash(&found.card.user_name),
                escape(&found.story.text)
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
}

pub fn render(doc: &ProcessImprovement, mode: ReportMode) -> String {
    let mut out = String::new();
    let subtitle = match mode {
        ReportMode::Simple => "Relatório Simples",
        ReportMode::Complete => "Relatório Completo",
    };
    open_document(&mut out, &doc.title, subtitle);
    write_framing(&mut out, doc);

    if mode == ReportMode::Complete {
        write_framing_text(&mut out, doc);
        write_node(&mut out, "Pré-operacional", &doc.start_node);
    }
    write_flows(&mut out, doc);
    if mode == ReportMode::Complete {
        write_node(&mut out, "Pós-operacional", &doc.end_node);
        write_deip(&mut out, doc);
        write_deliverables(&mut out, doc);
        write_list(&mut out, "Requisitos", &doc.requirements);
        write_list(&mut out, "Regras do Processo", &doc.process_rules);
        write_list(&mut out, "Riscos", &doc.risks);
    }

    close_document(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;

    fn sample() -> ProcessImprovement {
        let mut doc = ProcessImprovement::empty();
        doc.title = "Compras".to_string();
        doc.add_requirement("Integração com ERP");
        doc.add_deip_item(DeipCategory::Policies).title = "LGPD".to_string();
        doc.add_node_card(NodeKind::Start).title = "Demanda".to_string();

        let flow_id = doc.flows[0].id.clone();
        let step = doc.add_step(&flow_id).unwrap();
        step.name = "Cotação".to_string();
        let story_id = step
            .add_user_card("Comprador")
            .add_story("Comparar fornecedores")
            .map(|s| s.id.clone())
            .unwrap();
        doc.add_deliverable().toggle_story_link(&story_id);
        doc
    }

    #[test]
    fn test_simple_report_omits_scope_sections() {
        let out = render(&sample(), ReportMode::Simple);
        assert!(out.contains("Cotação"));
        assert!(!out.contains("LGPD"));
        assert!(!out.contains("Integração com ERP"));
        assert!(!out.contains("Entregas"));
    }

    #[test]
    fn test_complete_report_includes_everything() {
        let out = render(&sample(), ReportMode::Complete);
        assert!(out.contains("Cotação"));
        assert!(out.contains("<h3>Políticas</h3>"));
        assert!(out.contains("LGPD"));
        assert!(out.contains("Integração com ERP"));
        assert!(out.contains("Demanda"));
        assert!(out.contains("Nova Entrega"));
        assert!(out.contains("Cotação / Comprador: Comparar fornecedores"));
    }
}
