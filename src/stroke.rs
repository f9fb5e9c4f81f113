use egui::Pos2;

/// Every point drawn on the surface, in display coordinates.
///
/// Points are only ever appended. All gestures share one path until it is
/// cleared, so consecutive gestures are joined when the path is rasterized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePath {
    points: Vec<Pos2>,
}

impl StrokePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A piece of live feedback between two consecutive pointer positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Pos2,
    pub to: Pos2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle,
    /// A gesture is in progress; `anchor` is where the next feedback segment starts
    Drawing { anchor: Pos2, recorded: bool },
}

/// Turns begin/move/end gestures into an append-only [`StrokePath`]
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    state: StrokeState,
    path: StrokePath,
    gestures: usize,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self {
            state: StrokeState::Idle,
            path: StrokePath::new(),
            gestures: 0,
        }
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn path(&self) -> &StrokePath {
        &self.path
    }

    /// Number of gestures that added at least one point since the last clear
    pub fn gesture_count(&self) -> usize {
        self.gestures
    }

    /// Start a gesture at `point`. The start point itself is not recorded.
    pub fn begin(&mut self, point: Pos2) {
        self.state = StrokeState::Drawing {
            anchor: point,
            recorded: false,
        };
    }

    /// Record `point` if a gesture is in progress and return the segment to show
    pub fn extend(&mut self, point: Pos2) -> Option<Segment> {
        let StrokeState::Drawing { anchor, recorded } = self.state else {
            return None;
        };

        if !recorded {
            self.gestures += 1;
        }
        self.path.push(point);
        self.state = StrokeState::Drawing {
            anchor: point,
            recorded: true,
        };
        Some(Segment { from: anchor, to: point })
    }

    /// Finish the gesture. Returns whether the path is still empty, or `None`
    /// if no gesture was in progress.
    pub fn end(&mut self) -> Option<bool> {
        if !self.is_drawing() {
            return None;
        }
        self.state = StrokeState::Idle;
        Some(self.path.is_empty())
    }

    /// Drop every recorded point and abandon any gesture in progress
    pub fn clear(&mut self) {
        self.state = StrokeState::Idle;
        self.path = StrokePath::new();
        self.gestures = 0;
    }
}
