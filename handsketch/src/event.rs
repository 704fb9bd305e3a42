//! Events emitted by the frame pipeline to renderers and UI.

/// One discrete output of a frame or a tracing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Fist held long enough: flip eraser mode.
    ToggleEraser,
    /// Open palm: move to the next palette entry (wrapping).
    AdvanceColor { index: usize },
    /// Open palm: celebratory effect at the palm center.
    SpawnEffect { x: f64, y: f64 },
    /// Index pointing began a stroke.
    BeginStroke { x: f64, y: f64 },
    /// Index pointing continued the stroke.
    ExtendStroke { from: (f64, f64), to: (f64, f64) },
    /// Stroke finished or cancelled.
    EndStroke,
    /// A template step was traced or skipped.  `step` is zero-based.
    StepCompleted { step: usize, total: usize },
    /// Every step of the template is done.
    TemplateCompleted,
}

impl Event {
    /// Event name for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleEraser => "toggle-eraser",
            Self::AdvanceColor { .. } => "advance-color",
            Self::SpawnEffect { .. } => "spawn-effect",
            Self::BeginStroke { .. } => "begin-stroke",
            Self::ExtendStroke { .. } => "extend-stroke",
            Self::EndStroke => "end-stroke",
            Self::StepCompleted { .. } => "step-completed",
            Self::TemplateCompleted => "template-completed",
        }
    }

    /// Convert the event to an s-expression.
    pub fn to_sexp(&self) -> String {
        let fields = match self {
            Self::ToggleEraser | Self::EndStroke | Self::TemplateCompleted => String::new(),
            Self::AdvanceColor { index } => format!(" :index {}", index),
            Self::SpawnEffect { x, y } | Self::BeginStroke { x, y } => {
                format!(" :x {:.1} :y {:.1}", x, y)
            }
            Self::ExtendStroke { from, to } => format!(
                " :x1 {:.1} :y1 {:.1} :x2 {:.1} :y2 {:.1}",
                from.0, from.1, to.0, to.1
            ),
            Self::StepCompleted { step, total } => format!(" :step {} :total {}", step, total),
        };
        format!("(:type :event :event :{}{})", self.as_str(), fields)
    }
}
