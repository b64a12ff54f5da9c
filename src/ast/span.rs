use colored::Colorize;

/// Source region of a node: `(line, column)` pairs plus the originating
/// source text, kept so diagnostics can render an annotated excerpt.
#[derive(Default, Debug, Clone, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub source: String,
}

impl Span {
    /// Render this span as an annotated source excerpt with `msg` attached.
    /// The offending region is colored red, one line of leading context is
    /// shown and a squiggle marker points at the end of the region.
    pub fn annotate(&self, msg: impl ToString) -> String {
        let Span { start, end, source } = self;

        if source.is_empty() {
            return format!(
                "{}:{}: {}",
                start.0 + 1,
                start.1 + 1,
                msg.to_string()
            );
        }

        let line = start.0;
        let lines = source.lines().collect::<Vec<_>>();
        let prev_line = if line > 0 { lines[line - 1] } else { "" };
        let line_str = lines.get(line).copied().unwrap_or("");

        // margin before the left border
        let left_margin = format!("{}", end.0).len();
        let left_margin_fill = " ".repeat(left_margin);

        let split_at = start.1.min(line_str.len());
        let (left, right) = line_str.split_at(split_at);

        let (left, right) = if start.0 != end.0 {
            // the error spans multiple lines; mark the rest of the line
            (left.to_string(), right.to_string().red().to_string())
        } else {
            let err_len = end.1.saturating_sub(start.1).min(right.len());
            let (err_str, after_err) = right.split_at(err_len);
            (
                left.to_string(),
                format!("{}{after_err}", err_str.to_string().red()),
            )
        };

        let line_str = format!("{left}{right}");
        let left_padding_fill = " ".repeat(end.1.max(1) - 1);

        let mut annotated = format!(
            "{left_margin_fill} |\n{left_margin_fill} |{prev_line} \n{line} |{line_str}",
            line = line + 1
        );

        for line_number in (start.0 + 1)..(end.0 + 1) {
            annotated = format!(
                "{annotated}\n{left_margin_fill} |{}",
                lines.get(line_number).copied().unwrap_or("").red()
            );
        }

        format!(
            "{annotated}\n{} |{left_padding_fill}^--- {}\n{left_margin_fill} |",
            end.0 + 2,
            msg.to_string()
        )
    }

    pub fn merge(&self, other: &Span) -> Span {
        let Span { start, source, .. } = self.clone();
        let Span { end, .. } = other.clone();

        Span { start, end, source }
    }
}

impl PartialEq<Span> for Span {
    fn eq(&self, _other: &Span) -> bool {
        // node equality ignores positions
        true
    }
}

impl std::hash::Hash for Span {
    fn hash<H: std::hash::Hasher>(&self, _state: &mut H) {
        // consistent with the degenerate PartialEq above
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn test_spans_compare_equal() {
        let a = Span {
            start: (0, 0),
            end: (0, 3),
            source: "foo".into(),
        };
        let b = Span::default();

        assert_eq!(a, b);
    }

    #[test]
    fn test_annotate_without_source() {
        let span = Span {
            start: (4, 2),
            end: (4, 5),
            source: String::new(),
        };

        assert_eq!(span.annotate("boom"), "5:3: boom");
    }

    #[test]
    fn test_merge_keeps_outer_bounds() {
        let a = Span {
            start: (1, 0),
            end: (1, 4),
            source: "let x\nlet y".into(),
        };
        let b = Span {
            start: (1, 8),
            end: (1, 12),
            source: "let x\nlet y".into(),
        };

        let merged = a.merge(&b);
        assert_eq!(merged.start, (1, 0));
        assert_eq!(merged.end, (1, 12));
    }
}
