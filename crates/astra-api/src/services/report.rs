//! # PDF Report
//!
//! Renders an analysis as an A4 report with the built-in Helvetica fonts.
//! Text is laid out top-down from 280mm; a new page starts whenever the
//! cursor drops below the bottom margin. Built-in fonts only cover
//! Latin-1, so text is folded to that range first.

use std::io::BufWriter;

use astra_core::AnalysisResult;
use chrono::Utc;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use thiserror::Error;
use uuid::Uuid;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const WRAP_CHARS: usize = 95;

const TITLE: &str = "AstraMark Intelligence Report";
const FOOTER: &str = "Generated by AstraMark AI Marketing Intelligence Platform";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

/// Download name for an analysis report.
pub fn report_filename(analysis_id: Uuid) -> String {
    let id = analysis_id.to_string();
    format!("astramark_report_{}.pdf", &id[..8])
}

pub fn render_pdf(analysis: &AnalysisResult) -> Result<Vec<u8>, ReportError> {
    let mut page = PageWriter::new(TITLE)?;

    page.line(TITLE, 20.0, true, 0.0);
    page.gap(2.0);
    page.line(
        &format!("Generated: {}", Utc::now().format("%B %d, %Y at %H:%M UTC")),
        9.0,
        false,
        0.0,
    );
    page.gap(8.0);

    page.heading("Executive Summary");
    page.paragraph(&analysis.overview, 0.0);
    page.gap(4.0);

    page.heading("Key Performance Indicators");
    page.field("Confidence Score", &format!("{}%", analysis.confidence_score));
    page.field("Virality Score", &format!("{}/100", analysis.virality_score));
    page.field("Retention Score", &format!("{}/100", analysis.retention_score));
    page.field("AI Verdict", &analysis.ai_verdict);
    page.gap(4.0);

    let market = &analysis.market_analysis;
    page.heading("Market Analysis");
    page.field("Market Size", &market.market_size);
    page.field("Growth Rate", &market.growth_rate);
    page.field("Entry Barriers", &market.entry_barriers);
    page.gap(4.0);

    page.heading("SWOT Analysis");
    for (label, items) in [
        ("Strengths", &market.strengths),
        ("Weaknesses", &market.weaknesses),
        ("Opportunities", &market.opportunities),
        ("Threats", &market.risks),
    ] {
        page.line(label, 10.0, true, 0.0);
        page.bullets(items);
        page.gap(2.0);
    }

    page.page_break();
    page.heading("Target User Personas");
    for (idx, persona) in analysis.user_personas.iter().enumerate() {
        page.line(&format!("Persona {}: {}", idx + 1, persona.name), 10.0, true, 0.0);
        page.paragraph(&format!("Demographics: {}", persona.demographics), 0.0);
        page.paragraph(&format!("Psychographics: {}", persona.psychographics), 0.0);
        page.line("Pain Points:", 10.0, true, 0.0);
        page.bullets(&persona.pain_points);
        page.gap(4.0);
    }

    page.page_break();
    page.heading("Multi-Channel Marketing Strategies");
    for strategy in &analysis.strategies {
        page.line(&strategy.channel, 11.0, true, 0.0);
        page.paragraph(&strategy.strategy, 0.0);
        page.line("Content Ideas:", 10.0, true, 0.0);
        page.bullets(&strategy.content_ideas);
        page.field("Posting Schedule", &strategy.posting_schedule);
        page.gap(4.0);
    }

    page.page_break();
    let revenue = &analysis.revenue_projection;
    page.heading("Revenue Projections");
    page.field("Minimum Monthly", &revenue.min_monthly);
    page.field("Maximum Monthly", &revenue.max_monthly);
    page.field("Growth Timeline", &revenue.growth_timeline);
    page.gap(4.0);

    page.heading("Critical Action Items");
    page.field("Biggest Opportunity", &analysis.biggest_opportunity);
    page.field("Biggest Risk", &analysis.biggest_risk);
    page.field("Next Action", &analysis.next_action);
    page.gap(4.0);

    if let Some(proof) = &analysis.blockchain_proof {
        page.page_break();
        page.heading("Blockchain Verification");
        page.field("Hash", &proof.hash);
        page.field("Timestamp", &proof.timestamp);
        page.field("Network", &proof.network);
        if let Some(tx_hash) = &proof.tx_hash {
            page.field("Transaction", tx_hash);
        }
    }

    page.gap(10.0);
    page.line(FOOTER, 9.0, false, 0.0);

    page.finish()
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
        })
    }

    fn page_break(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// One unwrapped line. Line height follows the font size.
    fn line(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        if self.y < BOTTOM {
            self.page_break();
        }
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(latin1(text), size, Mm(LEFT + indent), Mm(self.y), font);
        self.y -= size * 0.5;
    }

    fn heading(&mut self, text: &str) {
        self.gap(2.0);
        self.line(text, 14.0, true, 0.0);
        self.gap(1.0);
    }

    fn paragraph(&mut self, text: &str, indent: f32) {
        for line in wrap_text(&latin1(text), WRAP_CHARS) {
            self.line(&line, 9.0, false, indent);
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        self.paragraph(&format!("{label}: {value}"), 0.0);
    }

    fn bullets(&mut self, items: &[String]) {
        if items.is_empty() {
            self.paragraph("N/A", 5.0);
        }
        for item in items {
            self.paragraph(&format!("- {item}"), 5.0);
        }
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Save(e.to_string()))?;
        buf.into_inner()
            .map_err(|e| ReportError::Save(e.to_string()))
    }
}

/// Fold typographic punctuation to ASCII and replace anything else outside
/// Latin-1 with `?`.
fn latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2022}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\n' | '\t' => out.push(' '),
            c if c.is_control() => {}
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_core::fallback;
    use astra_core::proof::BlockchainProof;

    fn analysis() -> AnalysisResult {
        AnalysisResult::assemble(
            Uuid::new_v4(),
            fallback::offline_analysis("offline"),
            fallback::agent_features("SaaS", "Grow signups"),
            Vec::new(),
            None,
            false,
        )
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = render_pdf(&analysis()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_content_spills_onto_new_pages() {
        let mut analysis = analysis();
        analysis.overview = "market ".repeat(4000);
        analysis.market_analysis.strengths = (0..200).map(|i| format!("Strength {i} \u{2014} \u{201C}quoted\u{201D}")).collect();
        analysis.blockchain_proof = Some(BlockchainProof::database(
            "ab".repeat(32),
            "2026-01-01 00:00:00 UTC".into(),
            analysis.id,
        ));
        let bytes = render_pdf(&analysis).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn filename_uses_short_id() {
        let id = Uuid::parse_str("1234abcd-0000-0000-0000-000000000000").unwrap();
        assert_eq!(report_filename(id), "astramark_report_1234abcd.pdf");
    }

    #[test]
    fn latin1_folding() {
        assert_eq!(latin1("\u{2022} it\u{2019}s \u{2014} caf\u{e9}\u{2026}"), "- it's - caf\u{e9}...");
        assert_eq!(latin1("rocket \u{1F680}"), "rocket ?");
        assert_eq!(latin1("a\nb"), "a b");
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
