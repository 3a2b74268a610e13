//! Running scripts against the engine.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

use crop_core::{CropWidget, ElementGeometry, FrameChange, RecordingHost};
use serde::Serialize;

use crate::script::{ReplayScript, Step};
use crate::{OutputFormat, ReplayError};

/// A frame-change notification and the step that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplayRecord {
    /// 1-based step index; 0 for construction.
    pub step: usize,
    /// The reported frame.
    pub change: FrameChange,
}

/// Result of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Notifications in emission order.
    pub records: Vec<ReplayRecord>,
    /// Frame after the last step.
    pub final_frame: FrameChange,
    /// Whether the script tore the widget down.
    pub removed: bool,
}

/// Replay `script` through a recording host.
///
/// # Errors
///
/// Returns an error if the widget rejects the script's options.
pub fn replay(script: &ReplayScript) -> Result<ReplayOutcome, ReplayError> {
    let mut host = RecordingHost::new(script.container);
    if let Some(image) = script.image {
        host = host.with_image(image);
    }

    let records = Rc::new(RefCell::new(Vec::new()));
    let current_step = Rc::new(Cell::new(0));
    let sink = Rc::clone(&records);
    let step_of = Rc::clone(&current_step);

    let mut widget = CropWidget::with_observer(host, script.options.clone(), move |change| {
        sink.borrow_mut().push(ReplayRecord {
            step: step_of.get(),
            change: *change,
        });
    })?;

    for (index, step) in script.steps.iter().enumerate() {
        current_step.set(index + 1);
        tracing::debug!(step = index + 1, ?step, "Replaying step");
        apply(&mut widget, step);
    }

    let outcome = ReplayOutcome {
        records: records.borrow().clone(),
        final_frame: widget.frame_change(),
        removed: widget.is_removed(),
    };
    tracing::info!(
        steps = script.steps.len(),
        notifications = outcome.records.len(),
        "Replay finished"
    );
    Ok(outcome)
}

fn apply(widget: &mut CropWidget<RecordingHost>, step: &Step) {
    match step {
        Step::Event { event } => {
            widget.handle_event(event);
        }
        Step::Resize { container, image } => {
            update_geometry(widget, *container, *image);
            widget.browser_resized();
        }
        Step::AnimationFrame => match widget.pending_frame() {
            Some(token) => {
                widget.animation_frame(token);
            }
            None => tracing::debug!("No pending frame to run"),
        },
        Step::Mutation { container, image } => {
            update_geometry(widget, *container, *image);
            widget.on_bounds_changed();
        }
        Step::Remove => widget.remove(),
    }
}

fn update_geometry(
    widget: &mut CropWidget<RecordingHost>,
    container: Option<ElementGeometry>,
    image: Option<ElementGeometry>,
) {
    let host = widget.host_mut();
    if let Some(container) = container {
        host.set_container(container);
    }
    if image.is_some() {
        host.set_image(image);
    }
}

/// Format records for output, one per line.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render(records: &[ReplayRecord], format: OutputFormat) -> Result<String, ReplayError> {
    let mut out = String::new();
    for record in records {
        match format {
            OutputFormat::Json => {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
            OutputFormat::Text => {
                let c = &record.change;
                // fmt::Write for String is infallible
                let _ = writeln!(
                    out,
                    "step {:>3}: top={} left={} bottom={} right={} width={} height={}",
                    record.step, c.top, c.left, c.bottom, c.right, c.width, c.height
                );
            }
        }
    }
    Ok(out)
}
