/*!
 * Placeholder language for WordprocessingML templates.
 *
 * Supports the subset of Jinja syntax docx templates use for subtitle
 * documents:
 * - `{{ filename }}`
 * - `{% for subtitle in subtitles %}` ... `{% endfor %}`
 * - `{{ subtitle.index }}`, `{{ subtitle.start }}`, `{{ subtitle.end }}`,
 *   `{{ subtitle.content }}` and `{{ loop.index }}` inside a loop
 * - `{%p ... %}`, `{%tr ... %}`, `{%tc ... %}`, `{%r ... %}`, which stand in for
 *   the enclosing paragraph, table row, table cell or run
 *
 * Anything else is rejected with a `RenderError` rather than rendered empty.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::time::Duration;

use crate::conversion::normalize::NormalizedEntry;
use crate::errors::{RenderError, SubtitleError};

static SPLIT_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?:<[^>]*>)+([{%])").expect("split-open pattern is valid")
});

static SPLIT_CLOSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([}%])(?:<[^>]*>)+\}").expect("split-close pattern is valid")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{(.*?)\}\}|\{%(.*?)%\}").expect("tag pattern is valid")
});

static XML_ELEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").expect("element pattern is valid")
});

static STRUCTURAL_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{%-?(p|tr|tc|r)\s").expect("structural tag pattern is valid")
});

static FOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^for\s+([A-Za-z_]\w*)\s+in\s+([A-Za-z_]\w*)$").expect("for pattern is valid")
});

static EXPR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)?$").expect("expression pattern is valid")
});

const LINE_BREAK: &str = r#"</w:t><w:br/><w:t xml:space="preserve">"#;

/// Per-file data bound into a template.
///
/// The subtitle sequence is consumed by the first loop over `subtitles`;
/// later loops see an exhausted sequence.
pub struct ConversionContext<I> {
    /// Base name of the source file without its extension
    pub filename: String,
    subtitles: Option<I>,
}

impl<I> ConversionContext<I>
where
    I: Iterator<Item = Result<NormalizedEntry, SubtitleError>>,
{
    /// Create a context for one file
    pub fn new(filename: impl Into<String>, subtitles: I) -> Self {
        Self {
            filename: filename.into(),
            subtitles: Some(subtitles),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    For {
        var: String,
        iterable: String,
        body: Vec<Node>,
    },
}

/// A compiled template part
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compile a WordprocessingML part
    pub fn compile(xml: &str) -> Result<Self, RenderError> {
        let xml = hoist_structural_tags(&merge_split_tags(xml))?;
        Ok(Self {
            nodes: parse_nodes(&xml)?,
        })
    }

    /// True when the part has no placeholders at all
    pub fn is_static(&self) -> bool {
        self.nodes.iter().all(|node| matches!(node, Node::Text(_)))
    }

    /// Render against a context, consuming its subtitle sequence if a loop asks for it
    pub fn render<I>(&self, context: &mut ConversionContext<I>) -> Result<String, RenderError>
    where
        I: Iterator<Item = Result<NormalizedEntry, SubtitleError>>,
    {
        let mut out = String::new();
        let mut state = RenderState {
            context,
            scopes: Vec::new(),
        };
        state.render_nodes(&self.nodes, &mut out)?;
        Ok(out)
    }
}

// Word splits typed text into runs, so `{{name}}` can arrive as
// `{</w:t></w:r><w:r><w:t>{name}}`. Rejoin the delimiters, then drop markup
// and entity escapes inside each tag.
fn merge_split_tags(xml: &str) -> String {
    let xml = SPLIT_OPEN_REGEX.replace_all(xml, "{$1");
    let xml = SPLIT_CLOSE_REGEX.replace_all(&xml, "$1}");
    TAG_REGEX
        .replace_all(&xml, |caps: &Captures| {
            let tag = XML_ELEMENT_REGEX.replace_all(&caps[0], "");
            unescape_xml(&tag)
        })
        .into_owned()
}

fn hoist_structural_tags(xml: &str) -> Result<String, RenderError> {
    let mut xml = xml.to_string();
    while let Some(caps) = STRUCTURAL_TAG_REGEX.captures(&xml) {
        let (tag_start, kind_end) = match caps.get(0) {
            Some(m) => (m.start(), m.end()),
            None => break,
        };
        let element = match &caps[1] {
            "p" => "w:p",
            "tr" => "w:tr",
            "tc" => "w:tc",
            _ => "w:r",
        };

        let tag_end = xml[kind_end..]
            .find("%}")
            .map(|idx| kind_end + idx + 2)
            .ok_or_else(|| RenderError::Syntax(format!("unterminated tag near '{}'", snippet(&xml, tag_start))))?;
        let statement = xml[kind_end..tag_end - 2].trim().to_string();

        let open_plain = format!("<{}>", element);
        let open_attrs = format!("<{} ", element);
        let open = [xml[..tag_start].rfind(&open_plain), xml[..tag_start].rfind(&open_attrs)]
            .into_iter()
            .flatten()
            .max()
            .ok_or_else(|| RenderError::Syntax(format!("'{{%{} %}}' is not inside a <{}> element", &caps[1], element)))?;

        let close_tag = format!("</{}>", element);
        let close = xml[tag_end..]
            .find(&close_tag)
            .map(|idx| tag_end + idx + close_tag.len())
            .ok_or_else(|| RenderError::Syntax(format!("unclosed <{}> around '{}'", element, statement)))?;

        xml.replace_range(open..close, &format!("{{% {} %}}", statement));
    }
    Ok(xml)
}

fn parse_nodes(xml: &str) -> Result<Vec<Node>, RenderError> {
    // Each open loop keeps its header and the nodes collected so far.
    let mut stack: Vec<(String, String, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut last = 0;

    for caps in TAG_REGEX.captures_iter(xml) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        if whole.start() > last {
            current.push(Node::Text(xml[last..whole.start()].to_string()));
        }
        last = whole.end();

        if let Some(expr) = caps.get(1) {
            let expr = expr.as_str().trim();
            if !EXPR_REGEX.is_match(expr) {
                return Err(RenderError::Syntax(format!("unsupported expression '{}'", expr)));
            }
            current.push(Node::Var(expr.to_string()));
            continue;
        }

        let statement = caps.get(2).map_or("", |m| m.as_str()).trim_matches('-').trim();
        if let Some(for_caps) = FOR_REGEX.captures(statement) {
            let outer = std::mem::take(&mut current);
            stack.push((for_caps[1].to_string(), for_caps[2].to_string(), outer));
        } else if statement == "endfor" {
            let (var, iterable, outer) = stack
                .pop()
                .ok_or_else(|| RenderError::Syntax("'endfor' without matching 'for'".to_string()))?;
            let body = std::mem::replace(&mut current, outer);
            current.push(Node::For { var, iterable, body });
        } else {
            return Err(RenderError::Syntax(format!("unsupported statement '{}'", statement)));
        }
    }

    if let Some((var, iterable, _)) = stack.last() {
        return Err(RenderError::Syntax(format!("'for {} in {}' is never closed", var, iterable)));
    }
    if last < xml.len() {
        current.push(Node::Text(xml[last..].to_string()));
    }
    Ok(current)
}

struct Scope {
    var: String,
    entry: NormalizedEntry,
    index: usize,
}

struct RenderState<'a, I> {
    context: &'a mut ConversionContext<I>,
    scopes: Vec<Scope>,
}

impl<I> RenderState<'_, I>
where
    I: Iterator<Item = Result<NormalizedEntry, SubtitleError>>,
{
    fn render_nodes(&mut self, nodes: &[Node], out: &mut String) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Var(expr) => {
                    let value = self.resolve(expr)?;
                    out.push_str(&escape_xml(&value).replace('\n', LINE_BREAK));
                }
                Node::For { var, iterable, body } => {
                    if iterable != "subtitles" {
                        return Err(RenderError::Unresolved(iterable.clone()));
                    }
                    // A second loop finds the sequence already taken: zero iterations.
                    let Some(subtitles) = self.context.subtitles.take() else {
                        continue;
                    };
                    for (index, item) in subtitles.enumerate() {
                        self.scopes.push(Scope {
                            var: var.clone(),
                            entry: item?,
                            index,
                        });
                        let result = self.render_nodes(body, out);
                        self.scopes.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve(&self, expr: &str) -> Result<String, RenderError> {
        let unresolved = || RenderError::Unresolved(expr.to_string());
        let Some((name, field)) = expr.split_once('.') else {
            return match expr {
                "filename" => Ok(self.context.filename.clone()),
                _ => Err(unresolved()),
            };
        };

        if name == "loop" && field == "index" {
            return self.scopes.last().map(|scope| (scope.index + 1).to_string()).ok_or_else(unresolved);
        }

        let scope = self.scopes.iter().rev().find(|scope| scope.var == name).ok_or_else(unresolved)?;
        match field {
            "index" => Ok(scope.entry.seq_num.to_string()),
            "start" => Ok(format_timedelta(scope.entry.start)),
            "end" => Ok(format_timedelta(scope.entry.end)),
            "content" => Ok(scope.entry.text.clone()),
            _ => Err(unresolved()),
        }
    }
}

/// Render a duration the way Python prints a `timedelta`, e.g. `0:01:05`
pub fn format_timedelta(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut text = String::new();
    if days > 0 {
        text.push_str(&format!("{} day{}, ", days, if days == 1 { "" } else { "s" }));
    }
    text.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    let micros = duration.subsec_micros();
    if micros > 0 {
        text.push_str(&format!(".{:06}", micros));
    }
    text
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn unescape_xml(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn snippet(text: &str, at: usize) -> String {
    text[at..].chars().take(24).collect()
}
