use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::i18n::{Language, Message, Translator, keys};
use crate::runner::types::RunSummary;
use crate::suite::TestSuite;
use crate::suite::test::Test;
use crate::suite::types::{OutcomeDetail, OutcomeMessage, TestOutcome};

/// 运行观察者
///
/// 核心在运行的各个阶段回调，渲染完全交给实现方；所有方法都有
/// 空默认实现，观察者只挑自己关心的阶段
pub trait Reporter: Send {
    fn on_run_start(&mut self) {}
    fn on_suite_start(&mut self, _suite: &TestSuite) {}
    fn on_test_result(&mut self, _test: &Test) {}
    fn on_suite_finish(&mut self, _suite: &TestSuite) {}
    fn on_run_finish(&mut self, _summary: &RunSummary) {}
}

/// 彩色控制台报告器
pub struct ConsoleReporter {
    translator: Translator,
}

impl ConsoleReporter {
    pub fn new(language: Language) -> Self {
        Self {
            translator: Translator::new(language),
        }
    }

    fn detail_text(&self, detail: &OutcomeDetail) -> String {
        let text = match &detail.message {
            OutcomeMessage::Keyed(message) => self.translator.translate(message),
            OutcomeMessage::Plain(text) => text.clone(),
        };
        match detail.location {
            Some(location) => format!("{} ({})", text, location),
            None => text,
        }
    }

    /// 多套件运行追加一张每套件的计数表
    fn print_suite_table(&self, summary: &RunSummary) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Suite", "Passed", "Failures", "Errors", "Pending", "Skipped"]);

        for suite in &summary.suites {
            let passed_color = if suite.failures + suite.errors == 0 {
                Color::Green
            } else {
                Color::Red
            };
            let failure_color = |count: usize| if count == 0 { Color::Reset } else { Color::Red };

            table.add_row(vec![
                Cell::new(&suite.name).add_attribute(Attribute::Bold),
                Cell::new(suite.passed).fg(passed_color),
                Cell::new(suite.failures).fg(failure_color(suite.failures)),
                Cell::new(suite.errors).fg(failure_color(suite.errors)),
                Cell::new(suite.pending).fg(Color::Yellow),
                Cell::new(suite.skipped).add_attribute(Attribute::Dim),
            ]);
        }

        println!("{}", table);
    }
}

impl Reporter for ConsoleReporter {
    fn on_run_start(&mut self) {
        println!("\n{}", self.translator.text(keys::RUN_STARTED).bold());
    }

    fn on_suite_start(&mut self, suite: &TestSuite) {
        let message = Message::new(keys::SUITE_STARTED, vec![suite.name().to_string()]);
        println!("\n{}", self.translator.translate(&message).bold());
    }

    fn on_test_result(&mut self, test: &Test) {
        match test.outcome() {
            Some(TestOutcome::Success) => {
                println!(
                    " {} {} ({}ms)",
                    "✓".green(),
                    test.name(),
                    test.duration().as_millis()
                );
            }
            Some(TestOutcome::Failure(detail)) => {
                println!(
                    " {} {} ({}ms)",
                    "✗".red(),
                    test.name(),
                    test.duration().as_millis()
                );
                println!("   {}", self.detail_text(detail).red());
            }
            Some(TestOutcome::Error(detail)) => {
                println!(
                    " {} {} ({}ms)",
                    "!".red().bold(),
                    test.name(),
                    test.duration().as_millis()
                );
                println!("   {}: {}", "Error".red().bold(), self.detail_text(detail));
            }
            Some(TestOutcome::Pending { reason, .. }) => {
                println!(" {} {}", "…".yellow(), test.name());
                let reason_text = reason
                    .clone()
                    .unwrap_or_else(|| self.translator.text(keys::PENDING_NO_REASON));
                println!("   {}", reason_text.yellow());
            }
            Some(TestOutcome::Skipped) => {
                println!(
                    " {} {} {}",
                    "⊘".dimmed(),
                    test.name(),
                    self.translator.text(keys::TEST_SKIPPED_SUFFIX).dimmed()
                );
            }
            None => {}
        }
    }

    fn on_run_finish(&mut self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", self.translator.text(keys::SUMMARY_TITLE).bold());
        println!("{}", "━".repeat(50));

        if summary.total == 0 {
            println!("  {}", self.translator.text(keys::RUN_NO_TESTS).yellow());
        }

        let counts = Message::new(
            keys::SUMMARY_TESTS,
            vec![
                summary.passed.to_string().green().to_string(),
                summary.failures.to_string().red().to_string(),
                summary.errors.to_string().red().bold().to_string(),
                summary.pending.to_string().yellow().to_string(),
                summary.skipped.to_string().dimmed().to_string(),
                summary.total.to_string(),
            ],
        );
        println!("  {}", self.translator.translate(&counts));

        let duration = Message::new(
            keys::SUMMARY_DURATION,
            vec![format!("{:.3}", summary.duration.as_secs_f64())],
        );
        println!("  {}", self.translator.translate(&duration));

        if summary.aborted {
            println!("  {}", self.translator.text(keys::FAIL_FAST_ABORTED).yellow());
        }

        if !summary.failure_details.is_empty() {
            println!(
                "\n  {}:",
                self.translator.text(keys::SUMMARY_FAILURES_TITLE).bold()
            );
            for record in &summary.failure_details {
                let (symbol, detail) = match &record.outcome {
                    TestOutcome::Failure(detail) => ("✗".red(), detail),
                    TestOutcome::Error(detail) => ("!".red().bold(), detail),
                    _ => continue,
                };
                println!(
                    "    {} {} » {}: {}",
                    symbol,
                    record.suite.bold(),
                    record.test.bold(),
                    self.detail_text(detail)
                );
            }
        }

        if summary.suites.len() > 1 {
            println!();
            self.print_suite_table(summary);
        }
        println!();
    }
}
