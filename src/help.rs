//! Help rendering.
//!
//! Rendering is a thin, swappable collaborator: the matcher hands any
//! [`HelpTemplate`] its ordered groups snapshot plus the display options, and
//! the template turns that into text. [`DefaultTemplate`] is the built-in
//! layout; implement the trait to render something else (a man page, shell
//! completion hints) from the same structure.

use crate::api::Options;
use crate::registry::Group;

/// Application context merged into rendered help.
#[derive(Debug, Clone)]
pub struct HelpContext {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

impl Default for HelpContext {
    fn default() -> Self {
        HelpContext {
            name: "Your app".into(),
            version: "0.0.0".into(),
            description: "This description needs to be customized !".into(),
            author: "John Doe".into(),
        }
    }
}

/// A help renderer. Receives the registry's groups in registration order;
/// each [`Group`] carries its alignment (`padding`/`prepadding`) so templates
/// can delegate to [`pad_entry`].
pub trait HelpTemplate {
    fn render(&self, ctx: &HelpContext, groups: &[(String, Group)], opts: &Options) -> String;
}

/// The built-in help layout:
///
/// ```text
/// {name} v{version} - {description} - by {author}
///
/// Usage:
///   {name} [group] [group]
///
/// {Group}s:
///
///   {entry.human_readable, padded} {entry.help}
/// ```
///
/// Hidden entries are skipped; two-line entries (short over long) are padded
/// on their longer line.
pub struct DefaultTemplate;

impl HelpTemplate for DefaultTemplate {
    fn render(&self, ctx: &HelpContext, groups: &[(String, Group)], opts: &Options) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("{} v{} - {} - by {}\n", ctx.name, ctx.version, ctx.description, ctx.author));
        out.push('\n');
        out.push_str("Usage:\n");
        out.push_str(&format!("  {}", ctx.name));
        for (name, _) in groups {
            out.push_str(&format!(" [{name}]"));
        }
        out.push('\n');
        out.push('\n');

        for (name, group) in groups {
            out.push('\n');
            out.push_str(&format!("{}s:\n", title_case(name)));
            out.push('\n');
            for entry in &group.entries {
                if entry.hidden {
                    continue;
                }
                out.push_str(&pad_entry(
                    &entry.human_readable,
                    group.padding,
                    group.prepadding,
                    opts.param_description_spacer,
                ));
                out.push(' ');
                out.push_str(entry.help.as_deref().unwrap_or(""));
                out.push('\n');
            }
        }
        out
    }
}

/// Pad a (possibly two-line) display string out to its group's alignment
/// column with `fill`, then indent the whole result by `prepadding` spaces.
///
/// The fill lands after the *last* line, sized so that line reaches
/// `padding` columns (+1 spacing column); a longer first line is left alone.
pub fn pad_entry(text: &str, padding: usize, prepadding: usize, fill: char) -> String {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or("").chars().count();
    let last = lines.next().map(|line| line.chars().count()).unwrap_or(first);

    let total = text.chars().count();
    let target = (padding + total + 1).saturating_sub(last);
    let mut padded = text.to_string();
    for _ in total..target {
        padded.push(fill);
    }
    format!("{}{}", " ".repeat(prepadding), padded)
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
