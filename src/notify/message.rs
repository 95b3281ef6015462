use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};

pub const ERROR_NAME_CLASS: &str = "toast-error-name";
pub const VALUE_NAME_CLASS: &str = "toast-value-name";

/// Toast body: lines of text with optional emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToastMessage {
    lines: Vec<SpanLine>,
}

impl ToastMessage {
    pub fn new() -> Self {
        Self {
            lines: vec![SpanLine::new()],
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push(Span::new(text));
        self
    }

    /// The name of the offending field.
    pub fn field_name(mut self, text: impl Into<String>) -> Self {
        let style = Style::new()
            .with_color(Color::Red)
            .with_bold()
            .with_class(ERROR_NAME_CLASS);
        self.push(Span::styled(text, style));
        self
    }

    /// A value the user is expected to enter, such as a bound.
    pub fn value(mut self, text: impl Into<String>) -> Self {
        let style = Style::new()
            .with_color(Color::Yellow)
            .with_bold()
            .with_class(VALUE_NAME_CLASS);
        self.push(Span::styled(text, style));
        self
    }

    pub fn line_break(mut self) -> Self {
        self.lines.push(SpanLine::new());
        self
    }

    pub fn lines(&self) -> &[SpanLine] {
        &self.lines
    }

    /// Markup for a browser toast; text is escaped, emphasis becomes
    /// `<span class=…>` and line breaks `<br>`.
    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|span| match span.style.class {
                        Some(class) => {
                            format!("<span class='{class}'>{}</span>", escape_html(&span.text))
                        }
                        None => escape_html(&span.text),
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("<br>")
    }

    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|span| span.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, span: Span) {
        if self.lines.is_empty() {
            self.lines.push(SpanLine::new());
        }
        if let Some(line) = self.lines.last_mut() {
            line.push(span);
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::ToastMessage;

    #[test]
    fn html_uses_emphasis_classes_and_breaks() {
        let message = ToastMessage::new()
            .field_name("Age:")
            .line_break()
            .text("Value must be between ")
            .value("18")
            .text(" and ")
            .value("99");
        assert_eq!(
            message.to_html(),
            "<span class='toast-error-name'>Age:</span><br>Value must be between \
             <span class='toast-value-name'>18</span> and <span class='toast-value-name'>99</span>"
        );
        assert_eq!(message.plain_text(), "Age:\nValue must be between 18 and 99");
    }

    #[test]
    fn html_escapes_field_text() {
        let message = ToastMessage::new().field_name("<b>").text(" is required.");
        assert_eq!(
            message.to_html(),
            "<span class='toast-error-name'>&lt;b&gt;</span> is required."
        );
    }
}
