//! Analysis report: overall score, factor bars, reviews, tips.

use ongil_core::analysis::{AnalysisResponse, TipLevel};
use ongil_core::numeric::format_amount;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

const BAR_WIDTH: usize = 20;

/// `score` (0-100) as a bar of `width` cells.
pub fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, theme::accent_bold()))
}

fn tip_icon(level: TipLevel) -> &'static str {
    match level {
        TipLevel::Success => "✔",
        TipLevel::Warning => "!",
        TipLevel::Info => "i",
        TipLevel::Other => "·",
    }
}

pub fn report_lines(report: &AnalysisResponse) -> Vec<Line<'static>> {
    let palette = theme::palette();
    let mut lines = Vec::new();

    match report.overall_score() {
        Some(score) => lines.push(Line::from(vec![
            Span::styled("Overall fit  ", theme::text()),
            Span::styled(
                format!("{score:.0} / 100"),
                theme::accent_bold().fg(palette.score_color(score)),
            ),
        ])),
        None => lines.push(Line::from(Span::styled("No scores returned", theme::muted()))),
    }
    lines.push(Line::raw(""));

    if !report.scores.is_empty() {
        lines.push(heading("Factors"));
        for item in report.ranked_scores() {
            let color = palette.score_color(item.score);
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16}", item.name), theme::text()),
                Span::styled(score_bar(item.score, BAR_WIDTH), theme::text().fg(color)),
                Span::styled(format!(" {:>3.0}", item.score), theme::text().fg(color)),
            ]));
            if let Some(reason) = &item.reason {
                lines.push(Line::from(Span::styled(format!("    {reason}"), theme::secondary())));
            }
            if let Some(price) = &item.expected_price {
                lines.push(Line::from(Span::styled(
                    format!(
                        "    expected rent {} / deposit {} (10k won)",
                        format_amount(price.monthly),
                        format_amount(price.security_deposit)
                    ),
                    theme::muted(),
                )));
            }
        }
        lines.push(Line::raw(""));
    }

    if let Some(review) = &report.review_analysis {
        lines.push(heading("Nearby reviews"));
        lines.push(Line::from(Span::styled(format!("  {}", review.summary), theme::text())));
        if !review.positive_keywords.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  + ", theme::positive()),
                Span::styled(review.positive_keywords.join(", "), theme::secondary()),
            ]));
        }
        if !review.negative_keywords.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  - ", theme::negative()),
                Span::styled(review.negative_keywords.join(", "), theme::secondary()),
            ]));
        }
        let p = review.average_menu_price;
        lines.push(Line::from(Span::styled(
            format!(
                "  menu price avg {} (min {}, max {}) won",
                format_amount(p.average),
                format_amount(p.min),
                format_amount(p.max)
            ),
            theme::muted(),
        )));
        for sample in &review.review_samples {
            lines.push(Line::from(vec![
                Span::styled(format!("  · {} ", sample.store_name), theme::text()),
                Span::styled(format!("★{:.1} ", sample.review_score), theme::warning()),
                Span::styled(
                    format!("{} won  {}", format_amount(sample.menu_average_price), sample.highlights.join(", ")),
                    theme::muted(),
                ),
            ]));
        }
        lines.push(Line::raw(""));
    }

    if !report.tips.is_empty() {
        lines.push(heading("Tips"));
        for tip in &report.tips {
            let level = tip.level();
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", tip_icon(level)), theme::text().fg(palette.tip_color(level))),
                Span::styled(tip.message.clone(), theme::text()),
            ]));
        }
        lines.push(Line::raw(""));
    }

    if let Some(detail) = &report.detail_analysis {
        let parts = [
            ("Summary", &detail.summary),
            ("Strengths", &detail.strengths),
            ("Weaknesses", &detail.weaknesses),
        ];
        if parts.iter().any(|(_, text)| text.is_some()) {
            lines.push(heading("Details"));
            for (label, text) in parts {
                if let Some(text) = text {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {label}: "), theme::neutral()),
                        Span::styled(text.clone(), theme::text()),
                    ]));
                }
            }
        }
    }
    lines
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(report) = &app.analysis.report else {
        f.render_widget(
            Paragraph::new(Span::styled("No report yet.", theme::muted())),
            area,
        );
        return;
    };
    let mut lines = report_lines(report);
    lines.push(Line::from(Span::styled(
        "↑/↓ scroll  n new analysis  Esc back to conditions",
        theme::muted(),
    )));
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.analysis.scroll, 0)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn bars_round_to_cells() {
        assert_eq!(score_bar(50.0, 4), "██░░");
        assert_eq!(score_bar(140.0, 3), "███");
        assert_eq!(score_bar(-5.0, 2), "░░");
    }

    #[test]
    fn report_lists_factors_best_first_and_tips() {
        let report: AnalysisResponse = serde_json::from_str(
            r#"{
                "scores": [
                    {"name": "budget", "score": 40, "reason": "rent is high"},
                    {"name": "location", "score": 90}
                ],
                "tips": [{"type": "warning", "message": "Check parking"}],
                "detailAnalysis": {"strengths": "foot traffic"}
            }"#,
        )
        .unwrap();
        let out = text(&report_lines(&report));
        assert!(out.contains("Overall fit  65 / 100"));
        assert!(out.find("location").unwrap() < out.find("budget").unwrap());
        assert!(out.contains("rent is high"));
        assert!(out.contains("! Check parking"));
        assert!(out.contains("Strengths: foot traffic"));
        assert!(!out.contains("Nearby reviews"));
    }

    #[test]
    fn empty_report_says_so() {
        let out = text(&report_lines(&AnalysisResponse::default()));
        assert!(out.contains("No scores returned"));
    }
}
