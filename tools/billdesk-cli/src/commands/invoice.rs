//! Interactive invoice session.

use anyhow::{Context as _, Result};
use billdesk_core::catalog::CatalogItem;
use billdesk_core::editor::{EditorEvent, InvoiceEditor};
use billdesk_core::invoice::{InvoiceConsumer, LineItem};
use billdesk_core::{Currency, Money};
use billdesk_observability::LoggingConsumer;
use chrono::{DateTime, Utc};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use serde::Serialize;

use super::InvoiceArgs;
use crate::context::Context;
use crate::output::Output;

/// Prints the running total and line summaries whenever they change.
pub struct ConsoleConsumer {
    output: Output,
    pending: Option<Money>,
}

impl ConsoleConsumer {
    pub fn new(output: Output) -> Self {
        Self { output, pending: None }
    }
}

impl InvoiceConsumer for ConsoleConsumer {
    fn on_total_changed(&mut self, total: Money) {
        self.pending = Some(total);
    }

    fn on_line_descriptions_changed(&mut self, descriptions: &[String]) {
        let Some(total) = self.pending.take() else {
            return;
        };
        if self.output.is_json() {
            return;
        }
        for line in descriptions {
            self.output.list_item(line);
        }
        println!("  {} {}", style("Total:").bold(), style(total.display()).bold().green());
    }
}

/// The finished invoice, as exported.
#[derive(Debug, Serialize)]
pub struct InvoiceExport {
    pub created_at: DateTime<Utc>,
    pub currency: Currency,
    pub lines: Vec<LineItem>,
    pub descriptions: Vec<String>,
    pub total: Money,
}

impl InvoiceExport {
    pub fn from_editor(editor: &InvoiceEditor) -> Self {
        let table = editor.table();
        let (total, descriptions) = match editor.totals() {
            Some(totals) => (totals.total, totals.descriptions.clone()),
            None => (Money::zero(table.currency()), Vec::new()),
        };
        Self {
            created_at: Utc::now(),
            currency: table.currency(),
            lines: table.rows().to_vec(),
            descriptions,
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Commit,
    Quantity,
    Rate,
    Remove,
    Show,
    Finish,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::Search,
        Action::Commit,
        Action::Quantity,
        Action::Rate,
        Action::Remove,
        Action::Show,
        Action::Finish,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Search => "Search and pick items",
            Action::Commit => "Add picked items to invoice",
            Action::Quantity => "Change a quantity",
            Action::Rate => "Change a rate",
            Action::Remove => "Remove a line",
            Action::Show => "Show invoice",
            Action::Finish => "Finish",
        }
    }

    /// Whether the action works on an existing row.
    fn needs_rows(&self) -> bool {
        matches!(self, Action::Quantity | Action::Rate | Action::Remove)
    }
}

fn candidate_label(item: &CatalogItem) -> String {
    if item.size.is_empty() {
        format!("{} {}", item.description, item.rate.display())
    } else {
        format!("{} ({}) {}", item.description, item.size, item.rate.display())
    }
}

fn row_label(index: usize, row: &LineItem) -> String {
    format!(
        "#{} {} x{} @ {} = {}",
        index + 1,
        row.description(),
        row.quantity(),
        row.rate().display(),
        row.total_rate().display()
    )
}

/// Run the invoice command.
pub async fn run(args: InvoiceArgs, ctx: &Context) -> Result<()> {
    let consumer = LoggingConsumer::new(ConsoleConsumer::new(ctx.output.clone()));
    let mut editor = InvoiceEditor::new(ctx.currency(), consumer);

    let source = ctx.open_source()?;
    let spinner = ctx.output.spinner(&format!("Loading catalog from {}", source.name()));
    let status = editor.init(source.as_ref()).await;
    spinner.finish_and_clear();
    ctx.report_status(&status);

    let theme = ColorfulTheme::default();
    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt(staging_prompt(&editor))
            .items(&labels)
            .default(0)
            .interact()?;
        let action = Action::ALL[choice];

        if action.needs_rows() && editor.table().is_empty() {
            ctx.output.warn("The invoice has no lines yet");
            continue;
        }

        match action {
            Action::Search => search(&mut editor, &theme, ctx)?,
            Action::Commit => match editor.commit() {
                Ok(committed) if committed.is_empty() => {
                    ctx.output.info("Nothing picked; invoice unchanged");
                }
                Ok(_) => {}
                Err(e) => ctx.output.warn(&format!("{}; picked items kept", e)),
            },
            Action::Quantity => {
                let row = pick_row(&editor, &theme)?;
                let input: String = Input::with_theme(&theme)
                    .with_prompt("Quantity")
                    .interact_text()?;
                if let Err(e) = editor.handle(EditorEvent::SetQuantity { row, input }) {
                    ctx.output.warn(&format!("{}; quantity unchanged", e));
                }
            }
            Action::Rate => {
                let row = pick_row(&editor, &theme)?;
                let input: String = Input::with_theme(&theme).with_prompt("Rate").interact_text()?;
                if let Err(e) = editor.handle(EditorEvent::SetRate { row, input }) {
                    ctx.output.warn(&format!("{}; rate unchanged", e));
                }
            }
            Action::Remove => {
                let row = pick_row(&editor, &theme)?;
                let removed = editor.remove_at(row)?;
                ctx.output.success(&format!("Removed {}", removed.description()));
            }
            Action::Show => show(&editor, &ctx.output),
            Action::Finish => break,
        }
    }

    let export = InvoiceExport::from_editor(&editor);
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write invoice: {}", path))?;
        ctx.output.success(&format!("Invoice written to {}", path));
    }
    if ctx.output.is_json() {
        ctx.output.json(&export);
    } else {
        ctx.output.success(&format!(
            "Invoice finished: {} line(s), total {}",
            export.lines.len(),
            export.total.display()
        ));
    }

    Ok(())
}

fn staging_prompt(editor: &InvoiceEditor) -> String {
    let staging = editor.staging();
    if staging.is_empty() {
        "Action".to_string()
    } else {
        format!("Action (picked: {})", staging.summary())
    }
}

fn search(editor: &mut InvoiceEditor, theme: &ColorfulTheme, ctx: &Context) -> Result<()> {
    let query: String = Input::with_theme(theme)
        .with_prompt("Search")
        .allow_empty(true)
        .interact_text()?;
    editor.handle(EditorEvent::QueryChanged(query))?;

    let candidates = editor.search().candidates.clone();
    if candidates.is_empty() {
        ctx.output.info("No matching items");
        return Ok(());
    }

    let labels: Vec<String> = candidates.iter().map(candidate_label).collect();
    let picked = MultiSelect::with_theme(theme)
        .with_prompt("Pick items (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()?;

    for index in picked {
        let item = &candidates[index];
        match editor.select(&item.id) {
            Ok(true) => {}
            Ok(false) => ctx.output.debug(&format!("{} is already picked", item.description)),
            Err(e) => ctx.output.warn(&format!("{} not picked: {}", item.description, e)),
        }
    }
    Ok(())
}

fn pick_row(editor: &InvoiceEditor, theme: &ColorfulTheme) -> Result<usize> {
    let labels: Vec<String> = editor
        .table()
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| row_label(i, row))
        .collect();
    let row = Select::with_theme(theme)
        .with_prompt("Line")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(row)
}

fn show(editor: &InvoiceEditor, output: &Output) {
    output.header("Invoice");
    if editor.table().is_empty() {
        output.info("No lines");
        return;
    }
    for (i, row) in editor.table().rows().iter().enumerate() {
        output.list_item(&row_label(i, row));
    }
    if let Some(totals) = editor.totals() {
        output.kv("total", &totals.total.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billdesk_core::catalog::StaticSource;

    fn widget() -> CatalogItem {
        CatalogItem::new(1u64, "Widget", "M", Money::new(250, Currency::USD))
    }

    #[tokio::test]
    async fn test_export_reflects_editor_state() {
        let output = Output::new(false, true);
        let mut editor = InvoiceEditor::new(Currency::USD, ConsoleConsumer::new(output));
        editor.init(&StaticSource::new(vec![widget()])).await;

        editor.input("wid");
        editor.select_candidate(0).unwrap();
        editor.commit().unwrap();
        editor.set_quantity(0, "3").unwrap();

        let export = InvoiceExport::from_editor(&editor);
        assert_eq!(export.lines.len(), 1);
        assert_eq!(export.total.amount_cents, 750);
        assert_eq!(
            export.descriptions,
            vec!["item_description: Widget item_size: M quantity: 3 rate:7.50".to_string()]
        );

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["currency"], "USD");
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn test_labels() {
        assert_eq!(candidate_label(&widget()), "Widget (M) $2.50");

        let row = LineItem::from_catalog(&widget());
        assert_eq!(row_label(0, &row), "#1 Widget x1 @ $2.50 = $2.50");
    }

    #[test]
    fn test_row_actions_are_flagged() {
        let needing: Vec<_> = Action::ALL.iter().filter(|a| a.needs_rows()).collect();
        assert_eq!(needing, vec![&Action::Quantity, &Action::Rate, &Action::Remove]);
    }
}
