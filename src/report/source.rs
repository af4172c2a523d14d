//! Source listing annotated with per-line samples.
//!
//! For every frame whose name passes a [`NameFilter`], in ranked order:
//!
//! ```text
//! A#pow (sample.rb:79)
//!                          |    79  |   def pow
//!   194  (25.7% / 100.0%)  |    80  |     2 ** 100
//! ```
//!
//! The first percentage is relative to the whole run, the second to the
//! frame's own self samples.

use super::ReportConfig;
use crate::aggregator::metrics::rank_frames;
use crate::profile::{check_line_samples, FrameId, FrameRecord, Profile};
use crate::utils::error::{RenderError, SourceUnavailable};
use log::{debug, warn};
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Selects frames by name
pub struct NameFilter {
    description: String,
    matcher: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl NameFilter {
    /// Filter with an arbitrary predicate over frame names
    pub fn new<F>(description: impl Into<String>, matcher: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            matcher: Box::new(matcher),
        }
    }

    /// Match one exact frame name
    pub fn exact(name: impl Into<String>) -> Self {
        let name = name.into();
        let wanted = name.clone();
        Self::new(format!("= {}", name), move |candidate| candidate == wanted)
    }

    /// Match frame names containing `fragment`
    pub fn containing(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        let wanted = fragment.clone();
        Self::new(format!("~ {}", fragment), move |candidate| {
            candidate.contains(wanted.as_str())
        })
    }

    /// Match frame names against a regular expression such as `pow|newobj`
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self::new(format!("/{}/", pattern), move |candidate| {
            regex.is_match(candidate)
        }))
    }

    pub fn matches(&self, name: &str) -> bool {
        (self.matcher)(name)
    }
}

impl fmt::Debug for NameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameFilter")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Line-indexed access to source files
pub trait SourceReader {
    /// All lines of `path`, in order, without line terminators
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceUnavailable>;
}

/// Reads sources from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceUnavailable> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

/// Why a matched frame has no listing
#[derive(Debug)]
pub enum SkipReason {
    /// No file, or neither a start line nor line samples to anchor on
    NoLocation,
    /// The file could not be read
    Unavailable(SourceUnavailable),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoLocation => write!(f, "no source location"),
            SkipReason::Unavailable(err) => write!(f, "{}", err),
        }
    }
}

/// A matched frame whose listing was not printed
#[derive(Debug)]
pub struct SkippedFrame {
    pub frame: FrameId,
    pub name: String,
    pub reason: SkipReason,
}

/// What a source render covered
#[derive(Debug, Default)]
pub struct SourceReport {
    /// Frames listed with their source, in output order
    pub rendered: Vec<FrameId>,

    /// Frames that matched but could not be listed
    pub skipped: Vec<SkippedFrame>,
}

impl SourceReport {
    /// Number of frames that passed the filter
    pub fn matched(&self) -> usize {
        self.rendered.len() + self.skipped.len()
    }
}

/// Annotate the source of every frame matching `filter`
///
/// **Public** - main entry point for annotated source output
///
/// Unreadable files are not fatal: the frame is reported in
/// `SourceReport::skipped` (and logged) and rendering continues.
/// No match at all is not an error either; nothing is written.
///
/// # Errors
/// * `RenderError::Integrity` - a matched frame's line samples do not sum to
///   its self samples; checked before anything is written
/// * `RenderError::Io` - the sink failed
pub fn render_source<W: Write>(
    profile: &Profile,
    filter: &NameFilter,
    reader: &dyn SourceReader,
    out: &mut W,
    config: Option<&ReportConfig>,
) -> Result<SourceReport, RenderError> {
    let config = config.cloned().unwrap_or_default();

    let matched: Vec<(FrameId, &FrameRecord)> = rank_frames(profile, config.tie_break)
        .into_iter()
        .filter(|(_, frame)| filter.matches(&frame.name))
        .collect();

    debug!("{} frames match filter {:?}", matched.len(), filter.description);

    for (id, frame) in &matched {
        check_line_samples(*id, frame)?;
    }

    let mut report = SourceReport::default();

    for (id, frame) in matched {
        match render_frame(profile, frame, reader, out, &config)? {
            Ok(()) => report.rendered.push(id),
            Err(reason) => {
                warn!("Skipping source for {} ({}): {}", frame.name, id, reason);
                report.skipped.push(SkippedFrame {
                    frame: id,
                    name: frame.name.clone(),
                    reason,
                });
            }
        }
    }

    Ok(report)
}

/// Render one frame; the inner result carries recoverable skips
fn render_frame<W: Write>(
    profile: &Profile,
    frame: &FrameRecord,
    reader: &dyn SourceReader,
    out: &mut W,
    config: &ReportConfig,
) -> Result<Result<(), SkipReason>, RenderError> {
    let Some(location) = frame.source_location.as_ref() else {
        writeln!(out, "{}", frame.name)?;
        return Ok(Err(SkipReason::NoLocation));
    };

    let Some((start, end)) = display_window(frame, config.source_window) else {
        writeln!(out, "{} ({})", frame.name, location)?;
        return Ok(Err(SkipReason::NoLocation));
    };

    writeln!(out, "{} ({}:{})", frame.name, location.file, start)?;

    let source = match reader.read_lines(Path::new(&location.file)) {
        Ok(lines) => lines,
        Err(err) => return Ok(Err(SkipReason::Unavailable(err))),
    };

    for lineno in start..=end {
        // Line numbers are 1-based; stop at end of file.
        let Some(code) = source.get(lineno as usize - 1) else {
            break;
        };

        let samples = frame
            .line_samples
            .as_ref()
            .and_then(|lines| lines.get(&lineno).copied());

        match samples {
            Some(samples) => {
                let run_pct = format!("({}", config.percent(samples, profile.overall_samples));
                let self_pct = format!("{})", config.percent(samples, frame.self_samples));
                writeln!(
                    out,
                    "{:>5} {:>7} / {:>7}  | {:>5}  | {}",
                    samples, run_pct, self_pct, lineno, code
                )?;
            }
            None => writeln!(out, "{:25}| {:>5}  | {}", "", lineno, code)?,
        }
    }

    Ok(Ok(()))
}

/// First and last line (inclusive, 1-based) to list for a frame
///
/// Starts at the frame's first line (the declaration) and runs one line past
/// the last sampled line, so the closing line of a block is shown, or `window`
/// lines past the start when there are no line samples. Sampled lines before
/// the declared start widen the window. The caller stops at end of file.
fn display_window(frame: &FrameRecord, window: u32) -> Option<(u32, u32)> {
    let declared = frame
        .source_location
        .as_ref()
        .and_then(|location| location.line)
        .filter(|line| *line > 0);

    let sampled = frame
        .line_samples
        .as_ref()
        .filter(|lines| !lines.is_empty())
        .and_then(|lines| Some((*lines.keys().next()?, *lines.keys().next_back()?)));

    match (declared, sampled) {
        (Some(start), Some((first, last))) => {
            Some((start.min(first).max(1), last.saturating_add(1).max(start)))
        }
        (Some(start), None) => Some((start, start.saturating_add(window))),
        (None, Some((first, last))) => Some((first.max(1), last.saturating_add(1))),
        (None, None) => None,
    }
}
