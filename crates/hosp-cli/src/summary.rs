use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hosp_cli::types::{RunResult, SourceSummary};

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: no files written");
    }
    println!("Reference year: {}", result.reference_year);
    println!("{}", source_table(result));
    println!("{}", reconcile_table(result));
    if let Some(path) = &result.final_output {
        println!("Final table: {}", path.display());
    }
    if let Some(path) = &result.audit_log {
        println!("Audit log: {}", path.display());
    }
}

fn source_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Loaded"),
        header_cell("Dropped"),
        header_cell("Dates coerced"),
        header_cell("Imputed"),
        header_cell("Mean cost"),
        header_cell("Cleaned output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for summary in [&result.sources.primary, &result.sources.supplementary] {
        table.add_row(source_row(summary));
    }
    table
}

fn source_row(summary: &SourceSummary) -> Vec<Cell> {
    let coerced = summary.normalization.dob_coerced + summary.normalization.last_visit_coerced;
    let imputed = summary.imputation.diagnosis_filled
        + summary.imputation.treatment_cost_filled
        + summary.imputation.last_visit_filled;
    vec![
        Cell::new(&summary.source)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.loaded),
        count_cell(summary.dropped(), Color::Yellow),
        count_cell(coerced, Color::Yellow),
        count_cell(imputed, Color::Cyan),
        match summary.imputation.treatment_cost_mean {
            Some(mean) => Cell::new(format!("{mean:.2}")),
            None => dim_cell("-"),
        },
        match &summary.cleaned_output {
            Some(path) => Cell::new(path.display()),
            None => dim_cell("-"),
        },
    ]
}

fn reconcile_table(result: &RunResult) -> Table {
    let report = &result.reconcile;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patients"),
        header_cell("In both"),
        header_cell("Primary only"),
        header_cell("Supplementary only"),
        header_cell("Duplicates"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.unified_rows).add_attribute(Attribute::Bold),
        Cell::new(report.matched),
        Cell::new(report.primary_only),
        Cell::new(report.supplementary_only),
        count_cell(report.duplicates_dropped, Color::Red),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
