//! Line-oriented terminal host for the wizard.
//!
//! Prompts come from the step definitions, toasts are drawn as boxes on the
//! error stream, and the summary is printed when the last step is reached.

use crate::error::Result;
use crate::notify::Toast;
use crate::runtime::submit::SubmitReceipt;
use crate::state::field::FieldSpec;
use crate::state::summary::SummaryView;
use crate::state::wizard::{FinishOutcome, StepValidator};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::ui::theme::Theme;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use indexmap::IndexMap;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const BACK_COMMAND: &str = ":back";
const MIN_TOAST_WIDTH: usize = 24;
const MAX_TOAST_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Submitted(SubmitReceipt),
    /// A step check failed in a scripted run.
    Blocked { step: usize },
    /// Input ended before the form was confirmed.
    Cancelled,
}

pub struct Console<R: BufRead, W: Write, E: Write> {
    input: R,
    out: W,
    err: E,
    theme: Theme,
    last_toast_id: u64,
}

impl<R: BufRead, W: Write, E: Write> Console<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        Self {
            input,
            out,
            err,
            theme: Theme::default_theme(),
            last_toast_id: 0,
        }
    }

    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Fills every handle from `answers`, then walks the steps forward and
    /// confirms the last one.
    pub fn run_scripted(
        &mut self,
        wizard: &mut StepValidator,
        answers: &IndexMap<String, String>,
    ) -> Result<RunOutcome> {
        for (id, value) in answers {
            if !wizard.registry_mut().set_value(id, value) {
                log::warn!("answer for unknown field `{id}` ignored");
            }
        }

        let Some(last) = wizard.flow().last_index() else {
            return Ok(RunOutcome::Cancelled);
        };
        for index in wizard.flow().current_index()..last {
            self.render_step_header(wizard, index)?;
            if !wizard.on_step_changing(index, index + 1) {
                self.render_toasts(wizard)?;
                return Ok(RunOutcome::Blocked { step: index });
            }
        }

        self.render_step_header(wizard, last)?;
        if wizard.flow().len() == 1 {
            wizard.rebuild_summary();
        }
        self.render_summary(wizard.summary())?;
        match wizard.on_finished(last)? {
            FinishOutcome::Submitted(receipt) => {
                self.render_submitted(&receipt)?;
                Ok(RunOutcome::Submitted(receipt))
            }
            FinishOutcome::Blocked => {
                self.render_toasts(wizard)?;
                Ok(RunOutcome::Blocked { step: last })
            }
        }
    }

    /// Prompts for each field of the current step until the form is
    /// confirmed or input ends.
    pub fn run_interactive(&mut self, wizard: &mut StepValidator) -> Result<RunOutcome> {
        if wizard.flow().len() == 1 {
            wizard.rebuild_summary();
        }
        loop {
            let index = wizard.flow().current_index();
            self.render_step_header(wizard, index)?;
            let fields = wizard
                .flow()
                .step_at(index)
                .map(|step| step.fields().to_vec())
                .unwrap_or_default();

            if wizard.flow().is_last(index) {
                self.render_summary(wizard.summary())?;
                if self.prompt_fields(wizard, &fields)? == PromptResult::Eof {
                    wizard.flow_mut().cancel_current();
                    return Ok(RunOutcome::Cancelled);
                }
                let Some(answer) = self.read_answer("Submit? [y]es / [b]ack / [e]dit: ")? else {
                    wizard.flow_mut().cancel_current();
                    return Ok(RunOutcome::Cancelled);
                };
                match answer.to_ascii_lowercase().as_str() {
                    "y" | "yes" => match wizard.on_finished(index)? {
                        FinishOutcome::Submitted(receipt) => {
                            self.render_submitted(&receipt)?;
                            return Ok(RunOutcome::Submitted(receipt));
                        }
                        FinishOutcome::Blocked => self.render_toasts(wizard)?,
                    },
                    "b" | "back" if index > 0 => {
                        wizard.on_step_changing(index, index - 1);
                    }
                    _ => {}
                }
                continue;
            }

            match self.prompt_fields(wizard, &fields)? {
                PromptResult::Eof => {
                    wizard.flow_mut().cancel_current();
                    return Ok(RunOutcome::Cancelled);
                }
                PromptResult::Back => {
                    if index > 0 {
                        wizard.on_step_changing(index, index - 1);
                    }
                }
                PromptResult::Done => {
                    if !wizard.on_step_changing(index, index + 1) {
                        self.render_toasts(wizard)?;
                    }
                }
            }
        }
    }

    fn prompt_fields(
        &mut self,
        wizard: &mut StepValidator,
        fields: &[FieldSpec],
    ) -> Result<PromptResult> {
        for field in fields {
            let current = wizard
                .registry()
                .value(field.id.as_str())
                .unwrap_or_default();
            let Some(answer) = self.read_answer(&prompt_text(field, &current))? else {
                return Ok(PromptResult::Eof);
            };
            if answer == BACK_COMMAND {
                return Ok(PromptResult::Back);
            }
            if !answer.is_empty() {
                wizard.registry_mut().set_value(field.id.as_str(), &answer);
            }
        }
        Ok(PromptResult::Done)
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        let style = self.theme.label;
        write_spans(&mut self.out, &[Span::styled(prompt, style)])?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn render_step_header(&mut self, wizard: &StepValidator, index: usize) -> io::Result<()> {
        let Some(step) = wizard.flow().step_at(index) else {
            return Ok(());
        };
        let mut spans = vec![Span::styled(
            format!("Step {}/{}: {}", index + 1, wizard.flow().len(), step.title),
            self.theme.title,
        )];
        if let Some(description) = &step.description {
            spans.push(Span::styled(format!("  {description}"), self.theme.hint));
        }
        writeln!(self.out)?;
        write_spans(&mut self.out, &spans)?;
        writeln!(self.out)
    }

    fn render_summary(&mut self, summary: &SummaryView) -> io::Result<()> {
        if summary.is_empty() {
            return Ok(());
        }
        let width = summary
            .iter()
            .map(|(slot, _)| UnicodeWidthStr::width(slot))
            .max()
            .unwrap_or(0);
        for (slot, value) in summary.iter() {
            let padding = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(slot)));
            write_spans(
                &mut self.out,
                &[
                    Span::styled(format!("  {slot}{padding}  "), self.theme.muted),
                    Span::new(value),
                ],
            )?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn render_submitted(&mut self, receipt: &SubmitReceipt) -> io::Result<()> {
        let text = match receipt {
            SubmitReceipt::Sent { status } => format!("Form submitted (HTTP {status})"),
            SubmitReceipt::Recorded => "Form submitted (dry run)".to_string(),
        };
        write_spans(&mut self.out, &[Span::styled(text, self.theme.success)])?;
        writeln!(self.out)
    }

    /// Draws toasts raised since the last call and drops expired ones.
    fn render_toasts(&mut self, wizard: &mut StepValidator) -> io::Result<()> {
        let now = Instant::now();
        wizard.toasts_mut().expire(now);

        let close_button = wizard.toasts().config().close_button;
        let progress_bar = wizard.toasts().config().progress_bar;
        let fresh: Vec<Toast> = wizard
            .toasts()
            .visible()
            .into_iter()
            .filter(|toast| toast.id > self.last_toast_id)
            .cloned()
            .collect();

        for toast in &fresh {
            let lines = toast_lines(toast, self.theme.error, close_button, progress_bar, now);
            for line in lines {
                write_spans(&mut self.err, &line)?;
                writeln!(self.err)?;
            }
            self.last_toast_id = self.last_toast_id.max(toast.id);
        }
        self.err.flush()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptResult {
    Done,
    Back,
    Eof,
}

fn prompt_text(field: &FieldSpec, current: &str) -> String {
    let mut text = field.label.clone();
    if field.is_numeric() && (field.range.min.is_some() || field.range.max.is_some()) {
        text.push_str(&format!(" ({})", field.range.describe()));
    }
    if field.is_required() {
        text.push('*');
    }
    if !current.is_empty() {
        text.push_str(&format!(" [{current}]"));
    }
    text.push_str(": ");
    text
}

fn toast_lines(
    toast: &Toast,
    border: Style,
    close_button: bool,
    progress_bar: bool,
    now: Instant,
) -> Vec<Vec<Span>> {
    let body = toast.message.lines();
    let inner = body
        .iter()
        .map(|line| {
            line.iter()
                .map(|span| UnicodeWidthStr::width(span.text.as_str()))
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0)
        .clamp(MIN_TOAST_WIDTH, MAX_TOAST_WIDTH);

    let close = if close_button { " × " } else { "" };
    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(vec![Span::styled(
        format!(
            "╭{}{close}╮",
            "─".repeat(inner + 2 - UnicodeWidthStr::width(close))
        ),
        border,
    )]);

    for line in body {
        let used: usize = line
            .iter()
            .map(|span| UnicodeWidthStr::width(span.text.as_str()))
            .sum();
        let mut spans = vec![Span::styled("│ ", border)];
        spans.extend(line.iter().cloned());
        spans.push(Span::new(" ".repeat(inner.saturating_sub(used))));
        spans.push(Span::styled(" │", border));
        lines.push(spans);
    }

    if progress_bar {
        let filled = (toast.remaining(now) * inner as f32).round() as usize;
        lines.push(vec![
            Span::styled("│ ", border),
            Span::styled("━".repeat(filled), border),
            Span::new(" ".repeat(inner.saturating_sub(filled))),
            Span::styled(" │", border),
        ]);
    }

    lines.push(vec![Span::styled(
        format!("╰{}╯", "─".repeat(inner + 2)),
        border,
    )]);
    lines
}

fn write_spans(out: &mut impl Write, spans: &[Span]) -> io::Result<()> {
    for span in spans {
        if let Some(color) = span.style.color {
            queue!(out, SetForegroundColor(map_color(color)))?;
        }
        if span.style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(span.text.as_str()), ResetColor)?;
        if span.style.bold {
            queue!(out, SetAttribute(Attribute::NormalIntensity))?;
        }
    }
    Ok(())
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::Reset => CrosstermColor::Reset,
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Red => CrosstermColor::Red,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::DarkYellow,
        Color::Blue => CrosstermColor::DarkBlue,
        Color::Cyan => CrosstermColor::DarkCyan,
        Color::White => CrosstermColor::White,
    }
}
