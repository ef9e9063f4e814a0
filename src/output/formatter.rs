//! Output formatters for the compatibility dashboard

use crate::analysis::AnalysisResult;
use crate::config::OutputFormat;
use crate::consistency::SimulatedConsistency;
use crate::controller::AnalysisState;
use crate::error::{Result, ResumeAtsError};
use crate::output::report::{AnalysisReport, ScoreBand};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

const GAUGE_WIDTH: usize = 20;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console dashboard with colours and a score gauge
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ATS Compatibility Report</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #1e293b; max-width: 900px; margin: 0 auto; padding: 20px; background: #f8fafc; }
        .card { background: white; padding: 24px; border-radius: 16px; box-shadow: 0 2px 10px rgba(0,0,0,0.06); margin: 16px 0; }
        .score { font-size: 3em; font-weight: 900; }
        .score-strong { color: #22c55e; }
        .score-moderate { color: #f59e0b; }
        .score-weak { color: #ef4444; }
        .chip { display: inline-block; padding: 4px 12px; margin: 4px; border-radius: 999px; background: #fef2f2; color: #b91c1c; font-size: 0.9em; }
        .skill { background: #eef2ff; color: #4338ca; }
        blockquote { border-left: 4px solid #6366f1; margin: 0; padding-left: 12px; }
        .metadata { font-size: 0.85em; color: #64748b; }
    </style>
    {% endif %}
</head>
<body>
    <div class="card">
        <h1>ATS Compatibility Report</h1>
        <div class="score {{ score_class }}">{{ score }}%</div>
        <p><strong>{{ score_label }}</strong> &middot; {{ verdict }}</p>
    </div>

    <div class="card">
        <h2>Match Analysis</h2>
        <p>{{ match_analysis }}</p>
        <h2>Recommendation</h2>
        <p>{{ recommendation }}</p>
    </div>

    <div class="card">
        <h2>Skills to Include</h2>
        {% if missing_keywords.is_empty() %}
        <p>No critical gaps found.</p>
        {% else %}
        {% for keyword in missing_keywords %}<span class="chip">{{ keyword }}</span>{% endfor %}
        {% endif %}
    </div>

    {% if has_linkedin %}
    <div class="card">
        <h2>LinkedIn Optimization</h2>
        <h3>Suggested Headline</h3>
        <blockquote>{{ headline }}</blockquote>
        <h3>Suggested About</h3>
        <p>{{ about }}</p>
        <h3>Top Skills to Add</h3>
        {% for skill in top_skills %}<span class="chip skill">{{ skill }}</span>{% endfor %}
    </div>
    {% endif %}

    <div class="metadata">
        <p>Generated {{ generated_at }} in {{ processing_time }}ms by resume-ats v{{ version }} using {{ model }}</p>
        <p>Resume: {{ resume_source }} | Job: {{ job_source }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    score: u8,
    score_class: String,
    score_label: String,
    verdict: String,
    match_analysis: String,
    recommendation: String,
    missing_keywords: Vec<String>,
    has_linkedin: bool,
    headline: String,
    about: String,
    top_skills: Vec<String>,
    generated_at: String,
    processing_time: u64,
    version: String,
    model: String,
    resume_source: String,
    job_source: String,
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
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Magenta,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn band_color(band: ScoreBand) -> Color {
        match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Moderate => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        }
    }

    /// `[██████████░░░░░░░░░░] 50%` coloured by band.
    pub fn format_gauge(&self, score: u8) -> String {
        let filled = (score as usize * GAUGE_WIDTH + 50) / 100;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled));
        let band = ScoreBand::from_score(score);
        format!(
            "[{}] {}% {}",
            self.colorize(&bar, Self::band_color(band)),
            score,
            self.format_badge(band)
        )
    }

    fn format_badge(&self, band: ScoreBand) -> String {
        if self.use_colors {
            format!("[{}]", band.label().color(Self::band_color(band)).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_chips(&self, items: &[String], color: Color) -> String {
        items
            .iter()
            .map(|item| self.colorize(&format!("[ {} ]", item), color))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Dashboard body for a single result.
    pub fn format_result(&self, result: &AnalysisResult) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("Compatibility Score", 2));
        output.push_str(&format!("{}\n", self.format_gauge(result.display_score())));
        if self.detailed && result.score != result.display_score() as i64 {
            output.push_str(&format!("(raw score reported by the model: {})\n", result.score));
        }

        output.push_str(&self.format_header("Match Analysis", 3));
        output.push_str(&format!("{}\n", result.match_analysis));

        output.push_str(&self.format_header("Recommendation", 3));
        output.push_str(&format!("{}\n", self.colorize(&result.recommendation, Color::Cyan)));

        output.push_str(&self.format_header("Skills to Include", 2));
        if result.missing_keywords.is_empty() {
            output.push_str(&format!("{}\n", self.colorize("No critical gaps found.", Color::Green)));
        } else {
            output.push_str(&format!("{}\n", self.format_chips(&result.missing_keywords, Color::Red)));
        }

        if let Some(linkedin) = &result.linkedin {
            output.push_str(&self.format_header("LinkedIn Optimization", 2));
            output.push_str(&format!("{}\n", self.colorize("Suggested headline:", Color::BrightBlack)));
            output.push_str(&format!("  \"{}\"\n\n", self.colorize(&linkedin.suggested_headline, Color::White)));
            output.push_str(&format!("{}\n", self.colorize("Suggested About:", Color::BrightBlack)));
            for line in linkedin.suggested_about.lines() {
                output.push_str(&format!("  {}\n", line));
            }
            output.push('\n');
            output.push_str(&format!("{}\n", self.colorize("Top skills to add:", Color::BrightBlack)));
            output.push_str(&format!("  {}\n", self.format_chips(&linkedin.top_skills_to_add, Color::Blue)));
        }

        output
    }

    /// Red banner shown for a failed analysis.
    pub fn format_error_banner(&self, message: &str) -> String {
        let text = format!(" ✖ {} ", message);
        if self.use_colors {
            format!("\n{}\n", text.white().on_red().bold())
        } else {
            format!("\n[ERROR]{}\n", text)
        }
    }

    pub fn render_state(&self, state: &AnalysisState) -> String {
        match state {
            AnalysisState::Idle => format!(
                "{}\n",
                self.colorize("Ready. Provide a resume and a job description to start.", Color::BrightBlack)
            ),
            AnalysisState::InFlight => format!(
                "{}\n",
                self.colorize("Analyzing skills and keywords against the job description...", Color::Magenta)
            ),
            AnalysisState::Succeeded(result) => self.format_result(result),
            AnalysisState::Failed(message) => self.format_error_banner(message),
        }
    }

    pub fn format_consistency(&self, check: &SimulatedConsistency) -> String {
        format!(
            "{}\nProfile consistency: {}%\n{}\n",
            self.format_header("Profile Consistency Check", 3).trim_end(),
            check.score,
            self.colorize(check.label(), Color::BrightYellow)
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("ATS COMPATIBILITY REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict, Color::Cyan)));

        output.push_str(&self.format_result(&report.result));

        if self.detailed {
            output.push_str(&self.format_header("Sources", 3));
            output.push_str(&format!("Resume: {}\n", report.metadata.resume_source));
            output.push_str(&format!("Job description: {}\n", report.metadata.job_source));
        }

        output.push_str(&format!(
            "\n{} Generated by resume-ats v{} | Model: {}\n",
            self.colorize("ℹ", Color::Blue),
            report.metadata.tool_version,
            report.metadata.model
        ));

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# ATS Compatibility Report\n\n");
        output.push_str(&format!(
            "**Score:** {}% ({})\n\n",
            result.display_score(),
            report.band().label()
        ));
        output.push_str(&format!("> {}\n\n", report.verdict));

        output.push_str("## Match Analysis\n\n");
        output.push_str(&format!("{}\n\n", result.match_analysis));

        output.push_str("## Recommendation\n\n");
        output.push_str(&format!("{}\n\n", result.recommendation));

        output.push_str("## Skills to Include\n\n");
        if result.missing_keywords.is_empty() {
            output.push_str("No critical gaps found.\n\n");
        } else {
            for keyword in &result.missing_keywords {
                output.push_str(&format!("- `{}`\n", keyword));
            }
            output.push('\n');
        }

        if let Some(linkedin) = &result.linkedin {
            output.push_str("## LinkedIn Optimization\n\n");
            output.push_str(&format!("**Suggested headline:** {}\n\n", linkedin.suggested_headline));
            output.push_str("**Suggested About:**\n\n");
            output.push_str(&format!("{}\n\n", linkedin.suggested_about));
            output.push_str("**Top skills to add:**\n\n");
            for skill in &linkedin.top_skills_to_add {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated {} by resume-ats v{} using `{}` in {}ms.*\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version,
                report.metadata.model,
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "*Resume: {} | Job: {}*\n",
                report.metadata.resume_source, report.metadata.job_source
            ));
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let result = &report.result;
        let band = report.band();
        let linkedin = result.linkedin.clone();

        HtmlTemplate {
            include_styles: self.include_styles,
            score: result.display_score(),
            score_class: band.css_class().to_string(),
            score_label: band.label().to_string(),
            verdict: report.verdict.clone(),
            match_analysis: result.match_analysis.clone(),
            recommendation: result.recommendation.clone(),
            missing_keywords: result.missing_keywords.clone(),
            has_linkedin: linkedin.is_some(),
            headline: linkedin.as_ref().map(|l| l.suggested_headline.clone()).unwrap_or_default(),
            about: linkedin.as_ref().map(|l| l.suggested_about.clone()).unwrap_or_default(),
            top_skills: linkedin.map(|l| l.top_skills_to_add).unwrap_or_default(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.metadata.processing_time_ms,
            version: report.metadata.tool_version.clone(),
            model: report.metadata.model.clone(),
            resume_source: report.metadata.resume_source.clone(),
            job_source: report.metadata.job_source.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeAtsError::OutputFormatting(e.to_string()))
    }
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
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and validate an output format name
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_ats{}.html", base_name, timestamp_suffix),
    }
}
