//! Build a `Profile` from captured call stacks.
//!
//! The sampling engine hands over one stack per sample, leaf first:
//! `[leaf, caller, caller's caller, ..., root]`. Each sample is folded into
//! per-frame counters, and `finish` produces the immutable profile.
//!
//! Collapsed stacks (`root;child;leaf 12`, as written by most flamegraph
//! tooling) are accepted too, which is how the CLI builds profiles offline.

use crate::profile::{FrameId, FrameRecord, Profile, SamplingMode, SourceLocation};
use crate::utils::config::UNKNOWN_FRAME_NAME;
use crate::utils::error::{ParseError, SampleOverflow};
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One entry of a captured stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEntry {
    pub frame: FrameId,

    /// Line executing in this frame when the sample fired
    pub line: Option<u32>,
}

impl StackEntry {
    pub fn new(frame: impl Into<FrameId>, line: Option<u32>) -> Self {
        Self {
            frame: frame.into(),
            line,
        }
    }
}

#[derive(Debug, Default)]
struct FrameCounts {
    total_samples: u64,
    self_samples: u64,
    /// Self samples whose line was unknown
    unlined_samples: u64,
    edges: BTreeMap<FrameId, u64>,
    lines: BTreeMap<u32, u64>,
}

#[derive(Debug, Clone)]
struct FrameInfo {
    name: String,
    location: Option<SourceLocation>,
}

/// Accumulates samples for a single profiling run
#[derive(Debug)]
pub struct ProfileBuilder {
    mode: SamplingMode,
    overall_samples: u64,
    info: HashMap<FrameId, FrameInfo>,
    counts: BTreeMap<FrameId, FrameCounts>,
}

impl ProfileBuilder {
    pub fn new(mode: SamplingMode) -> Self {
        Self {
            mode,
            overall_samples: 0,
            info: HashMap::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Attach a name and location to a frame id
    pub fn register_frame(
        &mut self,
        id: impl Into<FrameId>,
        name: impl Into<String>,
        location: Option<SourceLocation>,
    ) -> &mut Self {
        self.info.insert(
            id.into(),
            FrameInfo {
                name: name.into(),
                location,
            },
        );
        self
    }

    /// Fold one captured stack (leaf first) into the counters
    pub fn record_sample(&mut self, stack: &[StackEntry]) -> Result<&mut Self, SampleOverflow> {
        self.record_weighted(stack, 1)
    }

    /// Fold `weight` identical samples of the same stack
    ///
    /// Nothing is recorded when the run's sample count would overflow.
    pub fn record_weighted(
        &mut self,
        stack: &[StackEntry],
        weight: u64,
    ) -> Result<&mut Self, SampleOverflow> {
        // Every counter below is bounded by the overall count.
        self.overall_samples = self
            .overall_samples
            .checked_add(weight)
            .ok_or(SampleOverflow {
                overall_samples: self.overall_samples,
                weight,
            })?;

        // A recursive frame appears several times but is only "on stack" once,
        // and a repeated caller -> callee pair is one call path.
        let mut seen = HashSet::with_capacity(stack.len());
        let mut seen_edges = HashSet::with_capacity(stack.len());

        for (depth, entry) in stack.iter().enumerate() {
            let counts = self.counts.entry(entry.frame).or_default();

            if seen.insert(entry.frame) {
                counts.total_samples += weight;
            }

            if depth == 0 {
                counts.self_samples += weight;
                match entry.line.filter(|line| *line > 0) {
                    Some(line) => *counts.lines.entry(line).or_insert(0) += weight,
                    None => counts.unlined_samples += weight,
                }
            } else {
                let callee = stack[depth - 1].frame;
                if seen_edges.insert((entry.frame, callee)) {
                    *counts.edges.entry(callee).or_insert(0) += weight;
                }
            }
        }

        Ok(self)
    }

    /// Samples recorded so far
    pub fn overall_samples(&self) -> u64 {
        self.overall_samples
    }

    /// Produce the finished profile
    pub fn finish(self) -> Profile {
        let mut profile = Profile::new(self.mode, self.overall_samples);

        for (id, counts) in self.counts {
            let (name, location) = match self.info.get(&id) {
                Some(info) => (info.name.clone(), info.location.clone()),
                None => (UNKNOWN_FRAME_NAME.to_string(), None),
            };

            // A partial per-line breakdown would not sum to the self samples.
            let line_samples = if counts.lines.is_empty() {
                None
            } else if counts.unlined_samples > 0 {
                debug!(
                    "Dropping line samples for frame {} ({} samples without a line)",
                    id, counts.unlined_samples
                );
                None
            } else {
                Some(counts.lines)
            };

            let frame = FrameRecord {
                name,
                source_location: location,
                total_samples: counts.total_samples,
                self_samples: counts.self_samples,
                callees: (!counts.edges.is_empty()).then_some(counts.edges),
                line_samples,
            };
            profile.frames.insert(id, frame);
        }

        debug!(
            "Built profile: {} samples, {} frames",
            profile.overall_samples,
            profile.frames.len()
        );

        profile
    }

    /// Build a profile from collapsed stack text
    ///
    /// Frames are interned by name; ids start at 1 in first-seen order.
    pub fn from_collapsed(mode: SamplingMode, text: &str) -> Result<Profile, ParseError> {
        let stacks = parse_collapsed(text)?;
        let mut builder = ProfileBuilder::new(mode);
        let mut ids: HashMap<String, FrameId> = HashMap::new();

        for stack in &stacks {
            let mut entries = Vec::with_capacity(stack.frames.len());
            // Collapsed stacks are root first; samples are leaf first.
            for name in stack.frames.iter().rev() {
                let next_id = FrameId(ids.len() as u64 + 1);
                let id = *ids.entry(name.clone()).or_insert_with(|| {
                    builder.register_frame(next_id, name.clone(), None);
                    next_id
                });
                entries.push(StackEntry::new(id, None));
            }
            builder
                .record_weighted(&entries, stack.weight)
                .map_err(|err| ParseError::InvalidFormat {
                    line: stack.line,
                    reason: err.to_string(),
                })?;
        }

        debug!("Interned {} frames from {} collapsed stacks", ids.len(), stacks.len());

        Ok(builder.finish())
    }
}

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Frame names, root first
    pub frames: Vec<String>,

    /// Number of samples with exactly this stack
    pub weight: u64,

    /// 1-based line of the input it was read from
    pub line: usize,
}

/// Parse `root;child;leaf COUNT` lines
///
/// Blank lines and `#` comments are skipped.
pub fn parse_collapsed(text: &str) -> Result<Vec<CollapsedStack>, ParseError> {
    let mut stacks = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = |reason: &str| ParseError::InvalidFormat {
            line: index + 1,
            reason: reason.to_string(),
        };

        let (stack, count) = line
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| invalid("expected `stack count`"))?;

        let weight: u64 = count
            .parse()
            .map_err(|_| invalid("sample count is not a non-negative integer"))?;

        let frames: Vec<String> = stack
            .trim_end()
            .split(';')
            .map(str::to_string)
            .collect();

        if frames.iter().any(|frame| frame.is_empty()) {
            return Err(invalid("empty frame name"));
        }

        stacks.push(CollapsedStack {
            frames,
            weight,
            line: index + 1,
        });
    }

    Ok(stacks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu() -> SamplingMode {
        SamplingMode::Cpu { interval: 1000 }
    }

    #[test]
    fn test_record_sample_counts() {
        let mut builder = ProfileBuilder::new(cpu());
        builder
            .register_frame(1u64, "main", Some(SourceLocation::new("app.rb", Some(1))))
            .register_frame(2u64, "work", Some(SourceLocation::new("app.rb", Some(10))));

        builder
            .record_sample(&[StackEntry::new(2u64, Some(11)), StackEntry::new(1u64, Some(3))])
            .unwrap();
        builder
            .record_sample(&[StackEntry::new(2u64, Some(12)), StackEntry::new(1u64, Some(3))])
            .unwrap();
        builder.record_sample(&[StackEntry::new(1u64, Some(4))]).unwrap();

        let profile = builder.finish();
        assert_eq!(profile.overall_samples, 3);

        let main = profile.frame(FrameId(1)).unwrap();
        assert_eq!(main.total_samples, 3);
        assert_eq!(main.self_samples, 1);
        assert_eq!(main.callees.as_ref().unwrap()[&FrameId(2)], 2);
        assert_eq!(main.line_samples.as_ref().unwrap()[&4], 1);

        let work = profile.frame(FrameId(2)).unwrap();
        assert_eq!(work.total_samples, 2);
        assert_eq!(work.self_samples, 2);
        assert!(work.callees.is_none());
        assert_eq!(work.line_total(), Some(2));

        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_recursion_counts_total_once() {
        let mut builder = ProfileBuilder::new(cpu());
        builder.register_frame(1u64, "fib", None);
        builder
            .record_sample(&[
                StackEntry::new(1u64, Some(2)),
                StackEntry::new(1u64, Some(3)),
                StackEntry::new(1u64, Some(3)),
            ])
            .unwrap();

        let profile = builder.finish();
        let fib = profile.frame(FrameId(1)).unwrap();
        assert_eq!(fib.total_samples, 1);
        assert_eq!(fib.self_samples, 1);
        // fib -> fib appears twice on the stack but is one call path
        assert_eq!(fib.callees.as_ref().unwrap()[&FrameId(1)], 1);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_partial_lines_are_dropped() {
        let mut builder = ProfileBuilder::new(cpu());
        builder.record_sample(&[StackEntry::new(5u64, Some(7))]).unwrap();
        builder.record_sample(&[StackEntry::new(5u64, None)]).unwrap();

        let profile = builder.finish();
        let frame = profile.frame(FrameId(5)).unwrap();
        assert_eq!(frame.name, UNKNOWN_FRAME_NAME);
        assert_eq!(frame.self_samples, 2);
        assert!(frame.line_samples.is_none());
    }

    #[test]
    fn test_empty_stack_only_counts_overall() {
        let mut builder = ProfileBuilder::new(cpu());
        builder.record_sample(&[]).unwrap();
        assert_eq!(builder.overall_samples(), 1);

        let profile = builder.finish();
        assert!(profile.is_empty());
    }

    #[test]
    fn test_parse_collapsed() {
        let stacks = parse_collapsed("# comment\nmain;work 5\n\nmain 2\n").unwrap();
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].frames, vec!["main", "work"]);
        assert_eq!(stacks[0].weight, 5);
        assert_eq!(stacks[1].line, 4);
    }

    #[test]
    fn test_parse_collapsed_errors() {
        match parse_collapsed("main;work five") {
            Err(ParseError::InvalidFormat { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(parse_collapsed("main;;work 1").is_err());
        assert!(parse_collapsed("\nlonely").is_err());
    }

    #[test]
    fn test_weight_overflow_is_rejected() {
        let mut builder = ProfileBuilder::new(cpu());
        builder
            .record_weighted(&[StackEntry::new(1u64, None)], u64::MAX)
            .unwrap();

        let err = builder
            .record_weighted(&[StackEntry::new(2u64, None)], 1)
            .unwrap_err();
        assert_eq!(
            err,
            SampleOverflow {
                overall_samples: u64::MAX,
                weight: 1
            }
        );

        // The failed sample left no trace
        assert_eq!(builder.overall_samples(), u64::MAX);
        let profile = builder.finish();
        assert!(profile.frame(FrameId(2)).is_none());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_from_collapsed_overflow() {
        match ProfileBuilder::from_collapsed(cpu(), "a 18446744073709551615\n# more\nb 1\n") {
            Err(ParseError::InvalidFormat { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("sample count overflow"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_collapsed() {
        let profile =
            ProfileBuilder::from_collapsed(cpu(), "main;work;leaf 3\nmain;work 2\nmain 1\n").unwrap();

        assert_eq!(profile.overall_samples, 6);

        // Ids follow first-seen order of the leaf-first walk.
        let leaf = profile.frame(FrameId(1)).unwrap();
        assert_eq!(leaf.name, "leaf");
        assert_eq!(leaf.self_samples, 3);

        let work = profile.frame(FrameId(2)).unwrap();
        assert_eq!(work.name, "work");
        assert_eq!(work.total_samples, 5);
        assert_eq!(work.self_samples, 2);

        let main = profile.frame(FrameId(3)).unwrap();
        assert_eq!(main.total_samples, 6);
        assert_eq!(main.callees.as_ref().unwrap()[&FrameId(2)], 5);

        assert!(profile.validate().is_ok());
    }
}
