//! Graphviz call graph.
//!
//! One box per frame, sized by its share of self samples, and one labelled
//! edge per caller -> callee relation. Feed the output to `dot -Tsvg`.

use super::{visual_weight, ReportConfig};
use crate::aggregator::metrics::rank_frames;
use crate::profile::{check_callees, FrameRecord, Profile};
use crate::utils::config::{EDGE_BASE_WEIGHT, NODE_BASE_WEIGHT};
use crate::utils::error::RenderError;
use log::debug;
use std::io::Write;

/// Write a `digraph profile { ... }` description of the call graph
///
/// **Public** - main entry point for graph output
///
/// # Errors
/// * `RenderError::Integrity` - an edge points at a frame missing from the
///   profile; nothing is written in that case
/// * `RenderError::Io` - the sink failed
pub fn render_graph<W: Write>(
    profile: &Profile,
    out: &mut W,
    config: Option<&ReportConfig>,
) -> Result<(), RenderError> {
    check_callees(profile)?;

    let config = config.cloned().unwrap_or_default();
    let overall = profile.overall_samples;
    let mut edge_count = 0usize;

    writeln!(out, "digraph profile {{")?;

    for (id, frame) in rank_frames(profile, config.tie_break) {
        let size = visual_weight(NODE_BASE_WEIGHT, frame.self_samples, overall);

        writeln!(
            out,
            "  {} [size={:.2}] [fontsize={:.2}] [shape=box] [label=\"{}\\n{}\"];",
            id,
            size,
            size,
            escape_label(&frame.name),
            node_annotation(frame, overall, &config)
        )?;

        for (callee, weight) in frame.edges() {
            let pen = visual_weight(EDGE_BASE_WEIGHT, weight, overall);
            writeln!(
                out,
                "  {} -> {} [label=\"{}\"] [penwidth={:.2}];",
                id, callee, weight, pen
            )?;
            edge_count += 1;
        }
    }

    writeln!(out, "}}")?;

    debug!(
        "Rendered graph: {} nodes, {} edges",
        profile.frames.len(),
        edge_count
    );

    Ok(())
}

/// Sample lines of a node label
///
/// `self (pct)` is shown only when the frame also spends time in callees;
/// `total (pct)` is always shown. `\r` left-justifies lines in graphviz.
fn node_annotation(frame: &FrameRecord, overall: u64, config: &ReportConfig) -> String {
    let mut label = String::new();

    if frame.has_callee_time() {
        label.push_str(&format!(
            "{} ({})\\rof ",
            frame.self_samples,
            config.percent(frame.self_samples, overall)
        ));
    }

    label.push_str(&format!(
        "{} ({})\\r",
        frame.total_samples,
        config.percent(frame.total_samples, overall)
    ));

    label
}

/// Escape a frame name for a double-quoted DOT string
fn escape_label(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FrameId, SamplingMode};
    use crate::report::render_to_string;
    use crate::utils::error::DataIntegrityError;

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("block in <main>"), "block in <main>");
        assert_eq!(escape_label(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_label(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_node_annotation() {
        let config = ReportConfig::default();

        let caller = FrameRecord::new("A#math", 158, 11);
        assert_eq!(
            node_annotation(&caller, 754, &config),
            r"11 (1.5%)\rof 158 (21.0%)\r"
        );

        let leaf = FrameRecord::new("A#pow", 361, 361);
        assert_eq!(node_annotation(&leaf, 754, &config), r"361 (47.9%)\r");
    }

    #[test]
    fn test_zero_sample_graph() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 0)
            .with_frame(1u64, FrameRecord::new("<main>", 0, 0).with_callee(2u64, 0))
            .with_frame(2u64, FrameRecord::new("idle", 0, 0));

        let text = render_to_string(|out| render_graph(&profile, out, None)).unwrap();

        assert!(text.contains("  1 [size=10.00] [fontsize=10.00]"));
        assert!(text.contains("  1 -> 2 [label=\"0\"] [penwidth=1.00];"));
    }

    #[test]
    fn test_dangling_edge_writes_nothing() {
        let profile = Profile::new(SamplingMode::Cpu { interval: 1000 }, 1)
            .with_frame(1u64, FrameRecord::new("main", 1, 0).with_callee(9u64, 1));

        let mut out = Vec::new();
        let err = render_graph(&profile, &mut out, None).unwrap_err();

        assert!(matches!(
            err,
            RenderError::Integrity(DataIntegrityError::DanglingCallee { callee: FrameId(9), .. })
        ));
        assert!(out.is_empty());
    }
}
