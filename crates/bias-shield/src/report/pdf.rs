use std::path::PathBuf;

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Document, Element as _, PaperSize, SimplePageDecorator};
use tracing::debug;

use crate::config::ReportConfig;

use super::layout::DecisionReportLayout;

const APPROVED_COLOR: Color = Color::Rgb(0, 128, 0);
const DENIED_COLOR: Color = Color::Rgb(200, 0, 0);
const MUTED_COLOR: Color = Color::Rgb(128, 128, 128);
const HEADER_COLOR: Color = Color::Rgb(70, 110, 160);

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("unable to load font family '{family}' from {dir}")]
    Font {
        dir: PathBuf,
        family: String,
        #[source]
        source: genpdf::error::Error,
    },
    #[error("failed to lay out {section} table")]
    Table {
        section: &'static str,
        #[source]
        source: genpdf::error::Error,
    },
    #[error("failed to render decision report")]
    Render(#[source] genpdf::error::Error),
}

/// Renders a [`DecisionReportLayout`] to letter-sized PDF pages.
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    font_dir: PathBuf,
    font_family: String,
}

impl PdfReportRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            font_dir: config.font_dir.clone(),
            font_family: config.font_family.clone(),
        }
    }

    pub fn render(&self, layout: &DecisionReportLayout) -> Result<Vec<u8>, ReportError> {
        let fonts = genpdf::fonts::from_files(&self.font_dir, &self.font_family, None).map_err(
            |source| ReportError::Font {
                dir: self.font_dir.clone(),
                family: self.font_family.clone(),
                source,
            },
        )?;

        let mut doc = Document::new(fonts);
        doc.set_title(layout.title);
        doc.set_paper_size(PaperSize::Letter);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        doc.push(Paragraph::new(StyledString::new(
            layout.title,
            Style::new().bold().with_font_size(20),
        )));
        doc.push(Break::new(1));
        doc.push(Paragraph::new(layout.generated_on.as_str()));
        doc.push(Break::new(2));

        let decision_color = if layout.approved {
            APPROVED_COLOR
        } else {
            DENIED_COLOR
        };
        doc.push(Paragraph::new(StyledString::new(
            layout.decision_heading.as_str(),
            Style::new()
                .bold()
                .with_font_size(16)
                .with_color(decision_color),
        )));
        doc.push(Paragraph::new(StyledString::new(
            layout.probability_line.as_str(),
            Style::new().bold(),
        )));
        doc.push(Break::new(2));

        push_heading(&mut doc, "Applicant Information");
        doc.push(two_column_table(
            "applicant",
            ("Field", "Value"),
            (1, 2),
            &layout.applicant_rows,
        )?);
        doc.push(Break::new(2));

        push_heading(&mut doc, "Decision Factors");
        doc.push(two_column_table(
            "decision factor",
            ("Factor", "Impact"),
            (2, 1),
            &layout.factor_rows,
        )?);
        doc.push(Break::new(2));

        push_heading(&mut doc, "Detailed Explanation");
        for paragraph in &layout.paragraphs {
            doc.push(Paragraph::new(paragraph.as_str()));
            doc.push(Break::new(1));
        }

        doc.push(Break::new(2));
        let footer_style = Style::new().bold().with_font_size(8).with_color(MUTED_COLOR);
        for line in layout.footer {
            doc.push(Paragraph::new(StyledString::new(line, footer_style)));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(ReportError::Render)?;
        debug!(bytes = buffer.len(), "rendered decision report");
        Ok(buffer)
    }
}

fn push_heading(doc: &mut Document, text: &str) {
    doc.push(Paragraph::new(StyledString::new(
        text.to_string(),
        Style::new().bold().with_font_size(14),
    )));
    doc.push(Break::new(1));
}

fn two_column_table(
    section: &'static str,
    headers: (&str, &str),
    weights: (usize, usize),
    rows: &[(String, String)],
) -> Result<TableLayout, ReportError> {
    let mut table = TableLayout::new(vec![weights.0, weights.1]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let header_style = Style::new().bold().with_color(HEADER_COLOR);
    table
        .row()
        .element(Paragraph::new(StyledString::new(headers.0.to_string(), header_style)).padded(1))
        .element(Paragraph::new(StyledString::new(headers.1.to_string(), header_style)).padded(1))
        .push()
        .map_err(|source| ReportError::Table { section, source })?;

    for (label, value) in rows {
        table
            .row()
            .element(Paragraph::new(label.as_str()).padded(1))
            .element(Paragraph::new(value.as_str()).padded(1))
            .push()
            .map_err(|source| ReportError::Table { section, source })?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{DecisionReportLayout, DecisionReportRequest};
    use chrono::NaiveDate;

    #[test]
    fn missing_fonts_surface_as_font_errors() {
        let renderer = PdfReportRenderer::new(&ReportConfig {
            font_dir: PathBuf::from("/nonexistent/bias-shield/fonts"),
            font_family: "Missing".to_string(),
        });
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date");
        let layout = DecisionReportLayout::build(&DecisionReportRequest::default(), date);

        match renderer.render(&layout) {
            Err(ReportError::Font { family, .. }) => assert_eq!(family, "Missing"),
            other => panic!("expected font error, got {other:?}"),
        }
    }
}
