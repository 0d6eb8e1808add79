//! HTML rendering for the status page.

use super::facts::EnvironmentFacts;

/// Outcome of the optional peer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerStatus {
    /// No peer configured.
    Disabled,
    /// Peer answered with a body of this many bytes.
    Reached {
        /// Response body length.
        bytes: usize,
    },
    /// Peer call failed; the label names the failure kind.
    Unreachable(&'static str),
}

impl PeerStatus {
    /// Text shown in the peer row.
    pub fn label(&self) -> String {
        match self {
            PeerStatus::Disabled => "disabled".to_string(),
            PeerStatus::Reached { bytes } => format!("ok ({bytes} bytes)"),
            PeerStatus::Unreachable(kind) => format!("unreachable ({kind})"),
        }
    }
}

/// Render the status page.
pub fn render(facts: &EnvironmentFacts, peer: &PeerStatus) -> String {
    let rows = [
        ("Name", facts.name.as_str()),
        ("Platform", facts.platform.as_str()),
        ("Infra version", facts.infra_version.as_str()),
        ("Framework version", facts.framework_version.as_str()),
        ("Runtime version", facts.runtime_version.as_str()),
        ("Time", facts.time.as_str()),
    ];

    let mut table = String::new();
    for (label, value) in rows {
        table.push_str(&format!(
            "      <tr><th>{label}</th><td>{}</td></tr>\n",
            escape(value)
        ));
    }
    table.push_str(&format!(
        "      <tr><th>Peer</th><td>{}</td></tr>\n",
        escape(&peer.label())
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
  </head>
  <body>
    <h1>{title}</h1>
    <table>
{table}    </table>
  </body>
</html>
"#,
        title = escape(&facts.name),
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
