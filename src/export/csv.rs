//! Flat story table, one row per user story.

use crate::document::{ProcessImprovement, ProcessStep};

const HEADER: [&str; 9] = [
    "Fluxo",
    "Ordem",
    "Etapa",
    "Cenario Atual",
    "Cenario Futuro",
    "Status",
    "Usuario",
    "Prioridade",
    "Historia",
];

/// Shown instead of the future scenario of a step marked "no improvement".
pub const KEEP_CURRENT_PROCESS: &str = "MANTER PROCESSO ATUAL";
pub const STATUS_UNCHANGED: &str = "Sem Alteração";
pub const STATUS_IMPROVED: &str = "Com Melhoria";

/// Quote a cell; inner quotes are doubled.
fn cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn step_columns(flow_name: &str, order: usize, step: &ProcessStep) -> Vec<String> {
    let (future, status) = if step.no_improvement {
        (KEEP_CURRENT_PROCESS, STATUS_UNCHANGED)
    } else {
        (step.future_scenario.as_str(), STATUS_IMPROVED)
    };
    vec![
        flow_name.to_string(),
        order.to_string(),
        step.name.clone(),
        step.current_scenario.clone(),
        future.to_string(),
        status.to_string(),
    ]
}

pub fn render(doc: &ProcessImprovement) -> String {
    let mut lines = vec![row(&HEADER)];

    for flow in &doc.flows {
        for (idx, step) in flow.steps.iter().enumerate() {
            let base = step_columns(&flow.name, idx + 1, step);
            let with = |user: &str, priority: &str, text: &str| {
                let mut cells = base.clone();
                cells.extend([user.to_string(), priority.to_string(), text.to_string()]);
                row(&cells[..])
            };

            if step.user_cards.is_empty() {
                lines.push(with("", "", ""));
                continue;
            }
            for card in &step.user_cards {
                if card.stories.is_empty() {
                    lines.push(with(&card.user_name, "", ""));
                }
                for story in &card.stories {
                    lines.push(with(&card.user_name, story.priority.as_str(), &story.text));
                }
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_header_only() {
        let out = render(&ProcessImprovement::empty());
        assert_eq!(
            out,
            "\"Fluxo\",\"Ordem\",\"Etapa\",\"Cenario Atual\",\"Cenario Futuro\",\"Status\",\"Usuario\",\"Prioridade\",\"Historia\""
        );
    }

    #[test]
    fn test_rows_per_story_and_quoting() {
        let mut doc = ProcessImprovement::empty();
        let flow_id = doc.flows[0].id.clone();

        let step = doc.add_step(&flow_id).unwrap();
        step.name = "Triagem".to_string();
        step.current_scenario = "Manual \"por e-mail\"".to_string();
        step.future_scenario = "Portal".to_string();
        let card = step.add_user_card("Analista");
        card.add_story("Ver fila");
        card.add_story("Filtrar, ordenar");

        let quiet = doc.add_step(&flow_id).unwrap();
        quiet.name = "Arquivo".to_string();
        quiet.no_improvement = true;
        quiet.future_scenario = "ignorado".to_string();

        let out = render(&doc);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "\"Fluxo Principal\",\"1\",\"Triagem\",\"Manual \"\"por e-mail\"\"\",\"Portal\",\"Com Melhoria\",\"Analista\",\"Essencial\",\"Ver fila\""
        );
        assert!(lines[2].ends_with("\"Analista\",\"Essencial\",\"Filtrar, ordenar\""));
        assert_eq!(
            lines[3],
            "\"Fluxo Principal\",\"2\",\"Arquivo\",\"\",\"MANTER PROCESSO ATUAL\",\"Sem Alteração\",\"\",\"\",\"\""
        );
    }

    #[test]
    fn test_card_without_stories_gets_one_row() {
        let mut doc = ProcessImprovement::empty();
        let flow_id = doc.flows[0].id.clone();
        doc.add_step(&flow_id).unwrap().add_user_card("Gestor");

        let out = render(&doc);
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).unwrap().ends_with("\"Gestor\",\"\",\"\""));
    }
}
