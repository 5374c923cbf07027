//! Read-only HTML snapshot of the document.
//!
//! The output is a single self-contained file: styles are inline and every
//! piece of user text is escaped.

use std::fmt::Write;

use crate::document::{ProcessImprovement, ProcessStep, StoryPriority};

pub(crate) const STYLE: &str = "body{font-family:sans-serif;background:#f8fafc;color:#0f172a;margin:0;padding:2rem}\
main{max-width:960px;margin:0 auto}\
header{background:#0F5F87;color:#fff;padding:1.5rem;border-radius:12px}\
section{background:#fff;border:1px solid #e2e8f0;border-radius:12px;padding:1.5rem;margin-top:1.5rem}\
.muted{color:#94a3b8}.label{font-size:.75rem;font-weight:bold;text-transform:uppercase;color:#0F5F87}\
.scenarios{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
.unchanged h3{text-decoration:line-through;color:#94a3b8}\
.priority{font-size:.65rem;font-weight:bold;text-transform:uppercase;border:1px solid #e2e8f0;padding:0 .3rem;margin-right:.5rem}\
.essential{border-color:#fecaca;color:#dc2626}.should{border-color:#fde68a;color:#ca8a04}";

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `text`, or a dash when it is empty.
pub(crate) fn or_dash(text: &str) -> String {
    if text.trim().is_empty() {
        "-".to_string()
    } else {
        escape(text)
    }
}

fn priority_class(priority: &StoryPriority) -> &'static str {
    match priority {
        StoryPriority::Essential => "priority essential",
        StoryPriority::ShouldHave => "priority should",
        _ => "priority",
    }
}

pub(crate) fn open_document(out: &mut String, title: &str, subtitle: &str) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{title} - {subtitle}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n\
         <header><h1>{title}</h1><p>{subtitle} gerado em {date}</p></header>\n",
        title = escape(title),
        subtitle = escape(subtitle),
        date = chrono::Local::now().format("%d/%m/%Y"),
    );
}

pub(crate) fn close_document(out: &mut String) {
    out.push_str(
        "<footer class=\"muted\"><p>Gerado via ProcessFlow</p><p>Visualização somente leitura</p></footer>\n\
         </main>\n</body>\n</html>\n",
    );
}

pub(crate) fn write_framing(out: &mut String, doc: &ProcessImprovement) {
    out.push_str("<section>\n");
    for (label, value) in [
        ("Tema", &doc.theme),
        ("Setores", &doc.sectors),
        ("Gestores", &doc.managers),
    ] {
        let _ = writeln!(
            out,
            "<p class=\"label\">{}</p><p>{}</p>",
            label,
            or_dash(value)
        );
    }
    out.push_str("</section>\n");
}

pub(crate) fn write_step(out: &mut String, order: usize, step: &ProcessStep) {
    let class = if step.no_improvement { " class=\"unchanged\"" } else { "" };
    let _ = writeln!(out, "<article{}>", class);
    let _ = writeln!(out, "<h3>{}. {}</h3>", order, or_dash(&step.name));
    if !step.role.is_empty() {
        let _ = writeln!(out, "<p class=\"muted\">{}</p>", escape(&step.role));
    }

    let future = if step.no_improvement {
        "<em class=\"muted\">Sem alteração</em>".to_string()
    } else {
        or_dash(&step.future_scenario)
    };
    let _ = writeln!(
        out,
        "<div class=\"scenarios\"><div><p class=\"label\">Como é hoje</p><p>{}</p></div>\
         <div><p class=\"label\">Como será</p><p>{}</p></div></div>",
        or_dash(&step.current_scenario),
        future
    );

    if !step.no_improvement && !step.user_cards.is_empty() {
        out.push_str("<h4>Histórias de Usuário</h4>\n");
        for card in &step.user_cards {
            let _ = writeln!(out, "<p><strong>{}</strong></p>\n<ul>", or_dash(&card.user_name));
            for story in &card.stories {
                let _ = writeln!(
                    out,
                    "<li><span class=\"{}\">{}</span>{}</li>",
                    priority_class(&story.priority),
                    escape(story.priority.as_str()),
                    escape(&story.text)
                );
            }
            out.push_str("</ul>\n");
        }
    }
    out.push_str("</article>\n");
}

pub(crate) fn write_flows(out: &mut String, doc: &ProcessImprovement) {
    for flow in &doc.flows {
        out.push_str("<section>\n");
        let _ = writeln!(out, "<h2>{}</h2>", or_dash(&flow.name));
        if flow.steps.is_empty() {
            out.push_str("<p class=\"muted\">Nenhuma etapa cadastrada.</p>\n");
        }
        for (idx, step) in flow.steps.iter().enumerate() {
            write_step(out, idx + 1, step);
        }
        out.push_str("</section>\n");
    }
}

pub fn render(doc: &ProcessImprovement) -> String {
    let mut out = String::new();
    open_document(&mut out, &doc.title, "Visualização");
    write_framing(&mut out, doc);
    write_flows(&mut out, doc);
    close_document(&mut out);
    out
}
