//! Output formatters: console, JSON, Markdown, CSV, HTML and PDF

use crate::config::OutputFormat;
use crate::error::{AtsScorerError, Result};
use crate::output::report::*;
use crate::processing::aggregator::{CategoryScore, Decision};
use crate::processing::category_scorer::Category;
use crate::processing::gap_report::{GapReport, Priority};
use crate::processing::requirements::fmt_years;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting text reports
pub trait OutputFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String>;
    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and progress bars
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// CSV export, one row per category or per candidate
pub struct CsvFormatter;

pub struct HtmlFormatter {
    include_styles: bool,
}

/// PDF export built from the plain console layout
pub struct PdfFormatter {
    font_size: f32,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    csv_formatter: CsvFormatter,
    html_formatter: HtmlFormatter,
    pdf_formatter: PdfFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ATS Score: {{ candidate }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333; max-width: 900px; margin: 0 auto; padding: 20px; background: #f8f9fa; }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { border-bottom: 3px solid #007acc; padding-bottom: 10px; }
        h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 6px; }
        .badge { display: inline-block; padding: 6px 14px; border-radius: 16px; color: white; font-weight: bold; }
        .decision-green { background: #28a745; }
        .decision-orange { background: #fd7e14; }
        .decision-red { background: #dc3545; }
        table { width: 100%; border-collapse: collapse; }
        td, th { padding: 6px 8px; border-bottom: 1px solid #e9ecef; text-align: left; }
        .bar { background: #e9ecef; height: 10px; border-radius: 5px; width: 200px; }
        .bar-fill { background: #007acc; height: 10px; border-radius: 5px; }
        .priority-High { border-left: 4px solid #dc3545; padding-left: 10px; }
        .priority-Medium { border-left: 4px solid #ffc107; padding-left: 10px; }
        .priority-Low { border-left: 4px solid #28a745; padding-left: 10px; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>ATS Score Report: {{ candidate }}</h1>
        <p><strong>{{ total_score }} / 100</strong> <span class="badge decision-{{ decision_color }}">{{ decision_label }}</span></p>

        <h2>Category Breakdown</h2>
        <table>
            <tr><th>Category</th><th>Match</th><th></th><th>Points</th></tr>
            {% for row in rows %}
            <tr>
                <td>{{ row.name }}</td>
                <td>{{ row.percent }}%</td>
                <td><div class="bar"><div class="bar-fill" style="width: {{ row.percent }}%"></div></div></td>
                <td>{{ row.points }} / {{ row.weight }}</td>
            </tr>
            {% endfor %}
        </table>

        {% if !strengths.is_empty() %}
        <h2>Strengths</h2>
        <ul>{% for s in strengths %}<li>{{ s }}</li>{% endfor %}</ul>
        {% endif %}

        {% if !gaps.is_empty() %}
        <h2>Gaps</h2>
        <ul>{% for gap in gaps %}<li><strong>{{ gap.label }}:</strong> {{ gap.items }}</li>{% endfor %}</ul>
        {% endif %}

        {% if !recommendations.is_empty() %}
        <h2>Recommendations</h2>
        {% for rec in recommendations %}
        <div class="priority-{{ rec.priority }}">
            <h3>{{ rec.title }}</h3>
            <p>{{ rec.description }}</p>
        </div>
        {% endfor %}
        {% endif %}

        <div class="metadata">
            <p>Generated {{ generated_at }} by ats-scorer v{{ version }}</p>
            <p>Job: {{ job_file }}{% if !resume_file.is_empty() %} | Resume: {{ resume_file }}{% endif %}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct ReportTemplate<'a> {
    include_styles: bool,
    candidate: &'a str,
    total_score: String,
    decision_label: &'a str,
    decision_color: &'a str,
    rows: Vec<HtmlCategoryRow>,
    strengths: &'a [String],
    gaps: Vec<HtmlGap>,
    recommendations: Vec<HtmlRecommendation<'a>>,
    generated_at: String,
    version: &'a str,
    job_file: &'a str,
    resume_file: &'a str,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>ATS Leaderboard</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333; max-width: 1000px; margin: 0 auto; padding: 20px; }
        table { width: 100%; border-collapse: collapse; }
        td, th { padding: 6px 8px; border-bottom: 1px solid #e9ecef; text-align: left; }
        .decision-green { color: #28a745; font-weight: bold; }
        .decision-orange { color: #fd7e14; font-weight: bold; }
        .decision-red { color: #dc3545; font-weight: bold; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>ATS Leaderboard</h1>
    <p>Job: {{ job_file }} | {{ candidate_count }} candidates</p>
    <table>
        <tr><th>#</th><th>Candidate</th><th>Score</th><th>Decision</th><th>Missing skills</th></tr>
        {% for row in rows %}
        <tr>
            <td>{{ row.rank }}</td>
            <td>{{ row.name }}</td>
            <td>{{ row.score }}</td>
            <td class="decision-{{ row.color }}">{{ row.decision }}</td>
            <td>{{ row.missing }}</td>
        </tr>
        {% endfor %}
    </table>
    <div class="metadata">Generated {{ generated_at }} by ats-scorer v{{ version }}</div>
</body>
</html>"#, ext = "html")]
struct LeaderboardTemplate<'a> {
    include_styles: bool,
    job_file: &'a str,
    candidate_count: usize,
    rows: Vec<HtmlLeaderboardRow<'a>>,
    generated_at: String,
    version: &'a str,
}

struct HtmlCategoryRow {
    name: &'static str,
    percent: String,
    points: String,
    weight: String,
}

struct HtmlGap {
    label: &'static str,
    items: String,
}

struct HtmlRecommendation<'a> {
    priority: String,
    title: &'a str,
    description: &'a str,
}

struct HtmlLeaderboardRow<'a> {
    rank: usize,
    name: &'a str,
    score: String,
    decision: &'static str,
    color: &'static str,
    missing: String,
}

/// `[#######-------]` style bar; plain ASCII so it survives PDF export.
pub fn progress_bar(fraction: f32, width: usize) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (fraction * width as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Labelled missing-item lists, skipping empty ones.
fn gap_lines(gaps: &GapReport) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    let mut push = |label: &'static str, items: &[String]| {
        if !items.is_empty() {
            lines.push((label, items.join(", ")));
        }
    };
    push("Missing skills", &gaps.missing_skills);
    push("Missing tools", &gaps.missing_tools);
    push("Missing soft skills", &gaps.missing_soft_skills);
    push("Education (any of)", &gaps.missing_education);
    push("Missing sections", &gaps.missing_sections);
    push("Missing keywords", &gaps.missing_keywords);

    if let Some(required) = gaps.required_years {
        let stated = gaps
            .resume_years
            .map_or_else(|| "not stated".to_string(), |y| format!("{} years", fmt_years(y)));
        lines.push(("Experience", format!("JD asks for {}, resume: {}", required.describe(), stated)));
    }
    lines
}

fn decision_color(decision: Decision) -> Color {
    match decision {
        Decision::StrongFit => Color::Green,
        Decision::MediumFit => Color::TrueColor { r: 255, g: 165, b: 0 },
        Decision::WeakFit => Color::Red,
    }
}

fn priority_tag(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "[HIGH]",
        Priority::Medium => "[MEDIUM]",
        Priority::Low => "[LOW]",
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (rule, color) = match level {
            1 => ("=", Color::Blue),
            2 => ("-", Color::Green),
            _ => ("", Color::Yellow),
        };

        let underline = rule.repeat(title.chars().count());
        if self.use_colors {
            format!("\n{}\n{}\n", title.color(color).bold(), underline.color(color))
        } else {
            format!("\n{}\n{}\n", title, underline)
        }
    }

    fn format_decision(&self, decision: Decision) -> String {
        if self.use_colors {
            decision.label().color(decision_color(decision)).bold().to_string()
        } else {
            decision.label().to_string()
        }
    }

    fn format_category_row(&self, row: &CategoryScore) -> String {
        format!(
            "{:<14} {} {:>5.1}%  {:>6.2} / {:<6.2}\n",
            row.category.display_name(),
            progress_bar(row.fraction, 20),
            row.fraction * 100.0,
            row.points,
            row.weight
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String> {
        let mut output = String::new();
        let score = &report.score;

        output.push_str(&self.format_header(&format!("ATS SCORE: {}", report.candidate), 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&format!(
            "\nScore: {:.2} / 100  {}\n",
            score.total_score,
            self.format_decision(score.decision)
        ));

        output.push_str(&self.format_header("Category Breakdown", 2));
        for row in &score.categories {
            output.push_str(&self.format_category_row(row));
        }

        if !report.summary.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 2));
            for strength in &report.summary.strengths {
                output.push_str(&format!("  + {}\n", self.colorize(strength, Color::Green)));
            }
        }

        let gaps = gap_lines(&score.gaps);
        if !gaps.is_empty() {
            output.push_str(&self.format_header("Gaps", 2));
            for (label, items) in gaps {
                output.push_str(&format!("  {}: {}\n", self.colorize(label, Color::Yellow), items));
            }
        }

        if !score.gaps.near_misses.is_empty() {
            output.push_str(&self.format_header("Possible typos", 3));
            for near_miss in &score.gaps.near_misses {
                output.push_str(&format!(
                    "  '{}' looks like '{}' ({:.0}% similar)\n",
                    near_miss.found,
                    near_miss.required,
                    near_miss.similarity * 100.0
                ));
            }
        }

        if !score.gaps.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            let limit = if self.detailed { usize::MAX } else { 3 };
            for (i, rec) in score.gaps.recommendations.iter().take(limit).enumerate() {
                output.push_str(&format!("{}. {} {}\n", i + 1, rec.title, priority_tag(rec.priority)));
                output.push_str(&format!("   {}\n", rec.description));
            }
        }

        if self.detailed {
            let requirements = &score.requirements;
            output.push_str(&self.format_header("JD Requirements", 2));
            for (label, items) in [
                ("Skills", &requirements.skills),
                ("Tools", &requirements.tools),
                ("Education", &requirements.education),
                ("Soft skills", &requirements.soft_skills),
            ] {
                let listed: Vec<&str> = items.iter().map(String::as_str).collect();
                let listed = if listed.is_empty() { "(none)".to_string() } else { listed.join(", ") };
                output.push_str(&format!("  {}: {}\n", label, listed));
            }
            output.push_str(&format!(
                "  Experience: {}\n",
                requirements
                    .experience
                    .map_or_else(|| "(none)".to_string(), |r| r.describe())
            ));

            output.push_str(&format!(
                "\nJob: {} | Resume: {} | Matching: {:?} | Lexicon phrases: {}\n",
                report.metadata.job_file,
                report.metadata.resume_file.as_deref().unwrap_or("-"),
                report.metadata.engine.match_mode,
                report.metadata.engine.lexicon_phrases
            ));
        }

        Ok(output)
    }

    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("ATS LEADERBOARD", 1));
        output.push_str(&format!(
            "Job: {} | Candidates: {} | Generated: {}\n\n",
            leaderboard.metadata.job_file,
            leaderboard.len(),
            leaderboard.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        for entry in &leaderboard.entries {
            output.push_str(&format!(
                "{:>3}. {:<24} {} {:>6.2}  {}\n",
                entry.rank,
                entry.name,
                progress_bar(entry.total_score / 100.0, 20),
                entry.total_score,
                self.format_decision(entry.decision)
            ));
            if self.detailed && !entry.gaps.missing_skills.is_empty() {
                output.push_str(&format!(
                    "     missing skills: {}\n",
                    entry.gaps.missing_skills.join(", ")
                ));
            }
        }

        output.push('\n');
        for (decision, count) in leaderboard.decision_counts() {
            output.push_str(&format!("{}: {}\n", decision.label(), count));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String> {
        self.to_json(leaderboard)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn decision_badge(decision: Decision) -> &'static str {
        match decision {
            Decision::StrongFit => "🟢",
            Decision::MediumFit => "🟠",
            Decision::WeakFit => "🔴",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String> {
        let score = &report.score;
        let mut md = String::new();

        md.push_str(&format!("# ATS Score Report: {}\n\n", report.candidate));
        md.push_str(&format!(
            "**Score:** {:.2} / 100 {} **{}**\n\n",
            score.total_score,
            Self::decision_badge(score.decision),
            score.decision.label()
        ));

        md.push_str("## Category Breakdown\n\n");
        md.push_str("| Category | Match | Points | Weight |\n");
        md.push_str("|----------|------:|-------:|-------:|\n");
        for row in &score.categories {
            md.push_str(&format!(
                "| {} | {:.0}% | {:.2} | {:.2} |\n",
                row.category.display_name(),
                row.fraction * 100.0,
                row.points,
                row.weight
            ));
        }
        md.push('\n');

        if !report.summary.strengths.is_empty() {
            md.push_str("## Strengths\n\n");
            for strength in &report.summary.strengths {
                md.push_str(&format!("- {}\n", strength));
            }
            md.push('\n');
        }

        let gaps = gap_lines(&score.gaps);
        if !gaps.is_empty() {
            md.push_str("## Gaps\n\n");
            for (label, items) in gaps {
                md.push_str(&format!("- **{}:** {}\n", label, items));
            }
            md.push('\n');
        }

        if !score.gaps.recommendations.is_empty() {
            md.push_str("## Recommendations\n\n");
            for (i, rec) in score.gaps.recommendations.iter().enumerate() {
                md.push_str(&format!("{}. **{}** {}\n", i + 1, rec.title, priority_tag(rec.priority)));
                md.push_str(&format!("   {}\n", rec.description));
            }
            md.push('\n');
        }

        if self.include_metadata {
            md.push_str("---\n\n");
            md.push_str(&format!(
                "*Generated {} by ats-scorer v{}. Job: `{}`",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.scorer_version,
                report.metadata.job_file
            ));
            if let Some(resume) = &report.metadata.resume_file {
                md.push_str(&format!(", resume: `{}`", resume));
            }
            md.push_str("*\n");
        }

        Ok(md)
    }

    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String> {
        let mut md = String::new();

        md.push_str("# ATS Leaderboard\n\n");
        md.push_str(&format!("Job: `{}`\n\n", leaderboard.metadata.job_file));
        md.push_str("| Rank | Candidate | Score | Decision | Missing skills |\n");
        md.push_str("|-----:|-----------|------:|----------|----------------|\n");
        for entry in &leaderboard.entries {
            md.push_str(&format!(
                "| {} | {} | {:.2} | {} {} | {} |\n",
                entry.rank,
                entry.name,
                entry.total_score,
                Self::decision_badge(entry.decision),
                entry.decision.label(),
                entry.gaps.missing_skills.join(", ")
            ));
        }

        if self.include_metadata {
            md.push_str(&format!(
                "\n*Generated {} by ats-scorer v{}*\n",
                leaderboard.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                leaderboard.metadata.scorer_version
            ));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl CsvFormatter {
    fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
        let bytes = writer
            .into_inner()
            .map_err(|e| AtsScorerError::OutputFormatting(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AtsScorerError::OutputFormatting(format!("CSV is not valid UTF-8: {}", e)))
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["candidate", "category", "fraction", "weight", "points"])?;

        for row in &report.score.categories {
            writer.write_record([
                report.candidate.clone(),
                row.category.as_str().to_string(),
                format!("{:.4}", row.fraction),
                format!("{:.2}", row.weight),
                format!("{:.2}", row.points),
            ])?;
        }
        writer.write_record([
            report.candidate.clone(),
            "total".to_string(),
            String::new(),
            "100.00".to_string(),
            format!("{:.2}", report.score.total_score),
        ])?;

        Self::finish(writer)
    }

    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<&str> = vec!["rank", "candidate", "total_score", "decision"];
        header.extend(Category::ALL.iter().map(|c| c.as_str()));
        header.extend(["missing_skills", "missing_tools"]);
        writer.write_record(&header)?;

        for entry in &leaderboard.entries {
            let mut record = vec![
                entry.rank.to_string(),
                entry.name.clone(),
                format!("{:.2}", entry.total_score),
                entry.decision.label().to_string(),
            ];
            record.extend(Category::ALL.iter().map(|&c| format!("{:.2}", entry.points(c))));
            record.push(entry.gaps.missing_skills.join("; "));
            record.push(entry.gaps.missing_tools.join("; "));
            writer.write_record(&record)?;
        }

        Self::finish(writer)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &CandidateReport) -> Result<String> {
        let score = &report.score;
        let template = ReportTemplate {
            include_styles: self.include_styles,
            candidate: &report.candidate,
            total_score: format!("{:.2}", score.total_score),
            decision_label: score.decision.label(),
            decision_color: score.decision.color(),
            rows: score
                .categories
                .iter()
                .map(|row| HtmlCategoryRow {
                    name: row.category.display_name(),
                    percent: format!("{:.0}", row.fraction * 100.0),
                    points: format!("{:.2}", row.points),
                    weight: format!("{:.2}", row.weight),
                })
                .collect(),
            strengths: &report.summary.strengths,
            gaps: gap_lines(&score.gaps)
                .into_iter()
                .map(|(label, items)| HtmlGap { label, items })
                .collect(),
            recommendations: score
                .gaps
                .recommendations
                .iter()
                .map(|rec| HtmlRecommendation {
                    priority: format!("{:?}", rec.priority),
                    title: &rec.title,
                    description: &rec.description,
                })
                .collect(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            version: &report.metadata.scorer_version,
            job_file: &report.metadata.job_file,
            resume_file: report.metadata.resume_file.as_deref().unwrap_or(""),
        };

        template
            .render()
            .map_err(|e| AtsScorerError::OutputFormatting(e.to_string()))
    }

    fn format_leaderboard(&self, leaderboard: &Leaderboard) -> Result<String> {
        let template = LeaderboardTemplate {
            include_styles: self.include_styles,
            job_file: &leaderboard.metadata.job_file,
            candidate_count: leaderboard.len(),
            rows: leaderboard
                .entries
                .iter()
                .map(|entry| HtmlLeaderboardRow {
                    rank: entry.rank,
                    name: &entry.name,
                    score: format!("{:.2}", entry.total_score),
                    decision: entry.decision.label(),
                    color: entry.decision.color(),
                    missing: entry.gaps.missing_skills.join(", "),
                })
                .collect(),
            generated_at: leaderboard.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            version: &leaderboard.metadata.scorer_version,
        };

        template
            .render()
            .map_err(|e| AtsScorerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl PdfFormatter {
    const PAGE_WIDTH_MM: f32 = 210.0;
    const PAGE_HEIGHT_MM: f32 = 297.0;
    const MARGIN_MM: f32 = 15.0;

    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    pub fn render_report(&self, report: &CandidateReport) -> Result<Vec<u8>> {
        let text = ConsoleFormatter::new(false, true).format_report(report)?;
        self.render_lines(&format!("ATS Score: {}", report.candidate), &text)
    }

    pub fn render_leaderboard(&self, leaderboard: &Leaderboard) -> Result<Vec<u8>> {
        let text = ConsoleFormatter::new(false, true).format_leaderboard(leaderboard)?;
        self.render_lines("ATS Leaderboard", &text)
    }

    /// Lay plain text out on A4 pages in a built-in monospace font.
    fn render_lines(&self, title: &str, text: &str) -> Result<Vec<u8>> {
        use printpdf::{BuiltinFont, Mm, PdfDocument};

        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(Self::PAGE_WIDTH_MM),
            Mm(Self::PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| AtsScorerError::OutputFormatting(format!("PDF font unavailable: {}", e)))?;

        // Points to millimetres, with a little leading
        let line_height = self.font_size * 0.3528 * 1.4;
        let top = Self::PAGE_HEIGHT_MM - Self::MARGIN_MM;

        let mut current_layer = doc.get_page(page).get_layer(layer);
        let mut y = top;

        for line in text.lines() {
            if y < Self::MARGIN_MM {
                let (page, layer) = doc.add_page(
                    Mm(Self::PAGE_WIDTH_MM),
                    Mm(Self::PAGE_HEIGHT_MM),
                    "Layer 1",
                );
                current_layer = doc.get_page(page).get_layer(layer);
                y = top;
            }
            current_layer.use_text(to_pdf_text(line), self.font_size, Mm(Self::MARGIN_MM), Mm(y), &font);
            y -= line_height;
        }

        doc.save_to_bytes()
            .map_err(|e| AtsScorerError::OutputFormatting(format!("PDF generation failed: {}", e)))
    }
}

// Built-in PDF fonts only cover ASCII reliably.
fn to_pdf_text(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            csv_formatter: CsvFormatter,
            html_formatter: HtmlFormatter::new(true),
            pdf_formatter: PdfFormatter::new(9.0),
        }
    }

    fn text_formatter(&self, format: &OutputFormat) -> Option<&dyn OutputFormatter> {
        match format {
            OutputFormat::Console => Some(&self.console_formatter),
            OutputFormat::Json => Some(&self.json_formatter),
            OutputFormat::Markdown => Some(&self.markdown_formatter),
            OutputFormat::Csv => Some(&self.csv_formatter),
            OutputFormat::Html => Some(&self.html_formatter),
            OutputFormat::Pdf => None,
        }
    }

    /// Rendered bytes; UTF-8 text for everything except PDF.
    pub fn generate_report(&self, report: &CandidateReport, format: &OutputFormat) -> Result<Vec<u8>> {
        match self.text_formatter(format) {
            Some(formatter) => formatter.format_report(report).map(String::into_bytes),
            None => self.pdf_formatter.render_report(report),
        }
    }

    pub fn generate_leaderboard(&self, leaderboard: &Leaderboard, format: &OutputFormat) -> Result<Vec<u8>> {
        match self.text_formatter(format) {
            Some(formatter) => formatter.format_leaderboard(leaderboard).map(String::into_bytes),
            None => self.pdf_formatter.render_leaderboard(leaderboard),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &[u8], file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, base: &str, timestamp: bool) -> String {
    let base_name = Path::new(base)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Csv => "csv",
        OutputFormat::Html => "html",
        OutputFormat::Pdf => "pdf",
    };

    format!("{}_ats{}.{}", base_name, timestamp_suffix, extension)
}
