//! The glyph editor: stroke list, selection, groups, history and the pointer
//! state machine that ties them together.

use crate::codec::{export_svg, parse_svg};
use crate::config::EditorConfig;
use crate::geometry::{point_in_rect, stroke_centroid, strokes_bounds};
use crate::history::History;
use crate::input::{EditorCommand, KeyEvent, Modifiers, PointerEvent, command_for_key};
use crate::metrics::{FontLineFactors, GlyphBoxLayout, default_horizontal_box};
use crate::selection::{GroupTable, Selection, expand_selection};
use crate::skeleton::skeleton_strokes;
use crate::storage::{StorageError, StorageResult};
use crate::stroke::{Stroke, StrokeGroup, StrokeId};
use crate::tools::{DrawMode, circle_strokes};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::collections::HashSet;

/// Pointer travel below which a press on a stroke counts as a click.
pub const DRAG_THRESHOLD: f64 = 0.1;

/// Current pointer gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// First point of a stroke or circle placed, waiting for the second.
    AwaitingSecondPoint { start: Point, preview: Option<Point> },
    /// Dragging the bend handle of `stroke`. `before` is the pre-drag stroke
    /// list and `selected` the selection at press time; a release without
    /// movement is a click on the stroke.
    DraggingControl {
        stroke: StrokeId,
        anchor: Point,
        before: Vec<Stroke>,
        selected: Selection,
        modifiers: Modifiers,
        moved: bool,
    },
    /// Moving the selection. `origin` is the stroke list at press time.
    DraggingSelection {
        anchor: Point,
        origin: Vec<Stroke>,
        clicked: StrokeId,
        moved: bool,
    },
    /// Pressed a stroke that ended up deselected; release is a click.
    PressedStroke { clicked: StrokeId },
    /// Rubber-band selection in select mode.
    Marquee { start: Point, current: Point },
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Bend handle of a selected curved stroke.
    Handle(StrokeId),
    /// Body of a stroke.
    Stroke(StrokeId),
    Canvas,
}

/// Token identifying one document load; only the newest may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Result of [`GlyphEditor::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Document parsed and installed.
    Loaded { strokes: usize },
    /// Nothing stored (or a blank document); the editor is empty.
    Empty,
    /// Transport or decoding failure; the editor is empty.
    Failed,
    /// A newer load was started; the result was dropped.
    Superseded,
}

/// Interactive editor for one glyph.
#[derive(Debug, Clone)]
pub struct GlyphEditor {
    config: EditorConfig,
    letter: String,
    mode: DrawMode,
    line_factors: FontLineFactors,
    strokes: Vec<Stroke>,
    selection: Selection,
    groups: GroupTable,
    history: History,
    interaction: Interaction,
    /// Press on empty canvas in a drawing mode; release turns it into a click.
    canvas_press: Option<Point>,
    load_generation: u64,
}

impl Default for GlyphEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), "A")
    }
}

impl GlyphEditor {
    /// Create an empty editor for `letter`.
    pub fn new(config: EditorConfig, letter: impl Into<String>) -> Self {
        Self {
            mode: config.initial_mode,
            line_factors: config.line_factors.clamped(),
            history: History::new(config.history_capacity),
            config,
            letter: letter.into(),
            strokes: Vec::new(),
            selection: Selection::new(),
            groups: GroupTable::new(),
            interaction: Interaction::Idle,
            canvas_press: None,
            load_generation: 0,
        }
    }

    // ---------- accessors ----------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn letter(&self) -> &str {
        &self.letter
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn line_factors(&self) -> FontLineFactors {
        self.line_factors
    }

    /// Strokes in paint order (last is topmost).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: StrokeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn canvas_size(&self) -> Size {
        self.config.canvas_size()
    }

    /// Ink box and font lines for the current letter.
    pub fn layout(&self) -> GlyphBoxLayout {
        GlyphBoxLayout::for_letter(&self.letter, self.canvas_size(), self.line_factors)
    }

    /// First point of an unfinished stroke or circle.
    pub fn pending_start(&self) -> Option<Point> {
        match self.interaction {
            Interaction::AwaitingSecondPoint { start, .. } => Some(start),
            _ => None,
        }
    }

    /// Preview segment from the pending start to the pointer.
    pub fn preview_line(&self) -> Option<(Point, Point)> {
        match self.interaction {
            Interaction::AwaitingSecondPoint {
                start,
                preview: Some(preview),
            } => Some((start, preview)),
            _ => None,
        }
    }

    /// Normalised marquee rectangle while one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.interaction {
            Interaction::Marquee { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }

    // ---------- toolbar queries ----------

    pub fn has_strokes(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn can_group(&self) -> bool {
        self.selection.len() >= 2
    }

    pub fn can_ungroup(&self) -> bool {
        self.groups.has_group_for(&self.selection)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether there is something to upload under a non-blank letter.
    pub fn can_upload(&self) -> bool {
        self.has_strokes() && !self.letter.trim().is_empty()
    }

    // ---------- setters ----------

    /// Switch drawing mode, discarding a pending start point.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if matches!(
            self.interaction,
            Interaction::AwaitingSecondPoint { .. } | Interaction::Marquee { .. }
        ) {
            self.interaction = Interaction::Idle;
        }
        self.canvas_press = None;
        if self.mode != mode {
            log::debug!("Mode: {}", mode.display_name());
        }
        self.mode = mode;
    }

    /// Change the letter being edited. Strokes are left untouched.
    pub fn set_letter(&mut self, letter: impl Into<String>) {
        self.letter = letter.into();
    }

    /// Set the font line factors, each clamped to `[0, 1]`.
    pub fn set_line_factors(&mut self, factors: FontLineFactors) {
        self.line_factors = factors.clamped();
    }

    pub fn reset_line_factors(&mut self) {
        self.line_factors = FontLineFactors::default();
    }

    /// Resize the canvas. Returns false for a non-positive size.
    pub fn set_canvas_size(&mut self, size: Size) -> bool {
        if !(size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0) {
            return false;
        }
        self.config.canvas_width = size.width;
        self.config.canvas_height = size.height;
        true
    }

    // ---------- hit testing ----------

    /// Find what is under `position`: a bend handle first, then the topmost
    /// stroke body, else the canvas.
    pub fn hit_test(&self, position: Point) -> Hit {
        let handle = self.strokes.iter().rev().find(|s| {
            self.selection.contains(&s.id)
                && s.ctrl
                    .is_some_and(|c| c.distance(position) <= self.config.handle_radius)
        });
        if let Some(stroke) = handle {
            return Hit::Handle(stroke.id);
        }
        match self
            .strokes
            .iter()
            .rev()
            .find(|s| s.hit_test(position, self.config.hit_tolerance))
        {
            Some(stroke) => Hit::Stroke(stroke.id),
            None => Hit::Canvas,
        }
    }

    // ---------- pointer input ----------

    /// Feed one pointer event through the state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, modifiers } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(Some(position)),
            PointerEvent::Leave => self.pointer_up(None),
        }
    }

    fn pointer_down(&mut self, position: Point, modifiers: Modifiers) {
        // A press while a drag is still open means the release was lost.
        if !matches!(
            self.interaction,
            Interaction::Idle | Interaction::AwaitingSecondPoint { .. }
        ) {
            self.pointer_up(None);
        }
        self.canvas_press = None;

        match self.hit_test(position) {
            Hit::Handle(id) => {
                let group = self.expanded_group_of(id);
                let selected = std::mem::replace(&mut self.selection, group);
                self.interaction = Interaction::DraggingControl {
                    stroke: id,
                    anchor: position,
                    before: self.strokes.clone(),
                    selected,
                    modifiers,
                    moved: false,
                };
            }
            Hit::Stroke(id) => self.press_stroke(id, position, modifiers),
            Hit::Canvas if self.mode == DrawMode::Select => {
                self.interaction = Interaction::Marquee {
                    start: position,
                    current: position,
                };
            }
            Hit::Canvas => self.canvas_press = Some(position),
        }
    }

    fn press_stroke(&mut self, id: StrokeId, position: Point, modifiers: Modifiers) {
        self.selection = self.clicked_selection(&self.selection, id, modifiers);

        // Also drops any pending start point.
        self.interaction = if self.selection.contains(&id) {
            Interaction::DraggingSelection {
                anchor: position,
                origin: self.strokes.clone(),
                clicked: id,
                moved: false,
            }
        } else {
            Interaction::PressedStroke { clicked: id }
        };
    }

    /// Selection after a click on stroke `id` when `current` is selected.
    fn clicked_selection(
        &self,
        current: &Selection,
        id: StrokeId,
        modifiers: Modifiers,
    ) -> Selection {
        let group = self.expanded_group_of(id);
        if modifiers.multi_select() {
            if current.contains(&id) {
                current.difference(&group).copied().collect()
            } else {
                let mut requested = current.clone();
                requested.insert(id);
                expand_selection(&requested, &self.groups)
            }
        } else if current.len() == 1 && current.contains(&id) {
            Selection::new()
        } else {
            group
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match &mut self.interaction {
            Interaction::AwaitingSecondPoint { preview, .. } => *preview = Some(position),
            Interaction::Marquee { current, .. } => *current = position,
            Interaction::DraggingControl {
                stroke,
                anchor,
                moved,
                ..
            } => {
                if !*moved && (position - *anchor).hypot() <= DRAG_THRESHOLD {
                    return;
                }
                *moved = true;
                let id = *stroke;
                if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id == id) {
                    stroke.ctrl = Some(position);
                }
            }
            Interaction::DraggingSelection {
                anchor,
                origin,
                moved,
                ..
            } => {
                let delta = position - *anchor;
                if delta.hypot() > DRAG_THRESHOLD {
                    *moved = true;
                }
                self.strokes = translated(origin, &self.selection, delta);
            }
            Interaction::Idle | Interaction::PressedStroke { .. } => {}
        }
    }

    /// Release (`Some`) or leave (`None`): finish the current gesture.
    fn pointer_up(&mut self, position: Option<Point>) {
        if let Some(position) = position {
            self.pointer_move(position);
        }
        let canvas_click = position.filter(|_| self.canvas_press.take().is_some());
        self.canvas_press = None;

        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {
                if let Some(point) = canvas_click.filter(|_| self.mode.draws()) {
                    self.interaction = Interaction::AwaitingSecondPoint {
                        start: point,
                        preview: None,
                    };
                }
            }
            Interaction::AwaitingSecondPoint { start, preview } => match canvas_click {
                Some(point) => self.commit_second_point(start, point),
                None => self.interaction = Interaction::AwaitingSecondPoint { start, preview },
            },
            Interaction::DraggingControl {
                stroke,
                before,
                selected,
                modifiers,
                moved,
                ..
            } => {
                if moved {
                    let old = before.iter().find(|s| s.id == stroke).and_then(|s| s.ctrl);
                    let new = self.stroke(stroke).and_then(|s| s.ctrl);
                    if old != new {
                        self.history.push_snapshot(before);
                    }
                } else if position.is_some() {
                    // The stroke is already curved, so the click only toggles selection.
                    self.selection = self.clicked_selection(&selected, stroke, modifiers);
                }
            }
            Interaction::DraggingSelection {
                origin,
                clicked,
                moved,
                ..
            } => {
                if moved {
                    self.history.push_snapshot(origin);
                } else {
                    self.strokes = origin;
                    if position.is_some() {
                        self.click_stroke(clicked);
                    }
                }
            }
            Interaction::PressedStroke { clicked } => {
                if position.is_some() {
                    self.click_stroke(clicked);
                }
            }
            Interaction::Marquee { start, current } => {
                self.finish_marquee(Rect::from_points(start, current));
            }
        }
    }

    /// Second canvas click of a stroke or circle.
    fn commit_second_point(&mut self, start: Point, end: Point) {
        let width = self.config.default_stroke_width;
        let new_strokes = match self.mode {
            DrawMode::Stroke => vec![Stroke::new(start, end, width)],
            DrawMode::Circle => circle_strokes(start, end, self.config.circle_segments, width),
            DrawMode::Select => Vec::new(),
        };
        if new_strokes.is_empty() {
            return;
        }
        self.history.record(&self.strokes);
        self.strokes.extend(new_strokes);
    }

    /// A click on a stroke body gives a straight stroke a bend handle.
    fn click_stroke(&mut self, id: StrokeId) -> bool {
        let Some(index) = self.strokes.iter().position(|s| s.id == id) else {
            return false;
        };
        if self.strokes[index].is_curved() {
            return false;
        }
        self.history.record(&self.strokes);
        let stroke = &mut self.strokes[index];
        stroke.ctrl = Some(stroke.chord_midpoint());
        true
    }

    /// Toggle every stroke whose centroid lies in `rect`, then close over groups.
    fn finish_marquee(&mut self, rect: Rect) {
        let hits: Vec<StrokeId> = self
            .strokes
            .iter()
            .filter(|s| point_in_rect(stroke_centroid(s), rect))
            .map(|s| s.id)
            .collect();
        if hits.is_empty() {
            return;
        }
        let mut next = self.selection.clone();
        for id in hits {
            if !next.remove(&id) {
                next.insert(id);
            }
        }
        self.selection = expand_selection(&next, &self.groups);
    }

    // ---------- commands ----------

    /// Map a key press to a command and run it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match command_for_key(event) {
            Some(command) => self.handle_command(command),
            None => false,
        }
    }

    /// Run a direct command. Returns false if it had nothing to act on.
    pub fn handle_command(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::AdjustWidth(delta) => self.adjust_width(delta),
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::ClearAll => self.clear_all(),
            EditorCommand::Group => self.group_selection(),
            EditorCommand::Ungroup => self.ungroup_selection(),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::SetMode(mode) => {
                self.set_mode(mode);
                true
            }
            EditorCommand::InsertSkeleton => self.insert_skeleton(),
            EditorCommand::Scale { sx, sy } => self.scale_selection(sx, sy),
            EditorCommand::Nudge { dx, dy } => self.nudge_selection(dx, dy),
            EditorCommand::CancelGesture => self.cancel_gesture(),
        }
    }

    /// Change the width of the selected strokes, clamped to the allowed range.
    pub fn adjust_width(&mut self, delta: f64) -> bool {
        if self.selection.is_empty() || !delta.is_finite() {
            return false;
        }
        let mut adjusted = self.strokes.clone();
        for stroke in adjusted.iter_mut().filter(|s| self.selection.contains(&s.id)) {
            stroke.set_width(stroke.width + delta);
        }
        if adjusted == self.strokes {
            return false;
        }
        self.history.record(&self.strokes);
        self.strokes = adjusted;
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.history.record(&self.strokes);
        let selection = std::mem::take(&mut self.selection);
        self.strokes.retain(|s| !selection.contains(&s.id));
        self.prune_groups();
        self.clear_transient();
        log::debug!("Deleted {} strokes", selection.len());
        true
    }

    pub fn clear_all(&mut self) -> bool {
        if self.strokes.is_empty() {
            return false;
        }
        self.history.record(&self.strokes);
        self.strokes.clear();
        self.groups.clear();
        self.selection.clear();
        self.clear_transient();
        true
    }

    /// Group the selected strokes; the selection grows to the new group.
    pub fn group_selection(&mut self) -> bool {
        if self.groups.group(&self.selection).is_none() {
            return false;
        }
        self.selection = expand_selection(&self.selection, &self.groups);
        true
    }

    /// Dissolve every group touching the selection.
    pub fn ungroup_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.groups.ungroup(&self.selection) > 0
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.strokes) {
            return false;
        }
        self.after_history_jump();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.strokes) {
            return false;
        }
        self.after_history_jump();
        true
    }

    fn after_history_jump(&mut self) {
        self.selection.clear();
        self.prune_groups();
        self.clear_transient();
    }

    /// Insert the current letter's skeleton as one selected group.
    pub fn insert_skeleton(&mut self) -> bool {
        let skeleton = skeleton_strokes(&self.letter, &self.layout(), self.config.default_stroke_width);
        if skeleton.is_empty() {
            return false;
        }
        self.history.record(&self.strokes);
        let ids: Vec<StrokeId> = skeleton.iter().map(Stroke::id).collect();
        self.groups.insert(StrokeGroup::new(ids.iter().copied()));
        self.selection = ids.into_iter().collect();
        self.strokes.extend(skeleton);
        self.clear_transient();
        log::debug!("Inserted skeleton for {:?}", self.letter);
        true
    }

    /// Scale the selection around the centre of its bounding box.
    pub fn scale_selection(&mut self, sx: f64, sy: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v != 0.0;
        if !valid(sx) || !valid(sy) || (sx == 1.0 && sy == 1.0) {
            return false;
        }
        let Some(bounds) = strokes_bounds(self.strokes.iter().filter(|s| self.selection.contains(&s.id))) else {
            return false;
        };
        let center = bounds.center().to_vec2();
        let affine = Affine::translate(center) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-center);

        self.history.record(&self.strokes);
        for stroke in self.strokes.iter_mut().filter(|s| self.selection.contains(&s.id)) {
            stroke.transform(affine);
        }
        true
    }

    /// Move the selection by an offset.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64) -> bool {
        let delta = Vec2::new(dx, dy);
        if self.selection.is_empty() || !delta.is_finite() || delta == Vec2::ZERO {
            return false;
        }
        self.history.record(&self.strokes);
        self.strokes = translated(&self.strokes, &self.selection, delta);
        true
    }

    /// Drop the pending start point and abort any drag, restoring its origin.
    pub fn cancel_gesture(&mut self) -> bool {
        self.canvas_press = None;
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => false,
            Interaction::DraggingControl { before, .. } => {
                self.strokes = before;
                true
            }
            Interaction::DraggingSelection { origin, .. } => {
                self.strokes = origin;
                true
            }
            Interaction::AwaitingSecondPoint { .. }
            | Interaction::PressedStroke { .. }
            | Interaction::Marquee { .. } => true,
        }
    }

    // ---------- documents ----------

    /// The current strokes as an SVG document framed on the letter's ink box.
    pub fn export_document(&self) -> String {
        self.export_document_for(&self.letter)
    }

    /// The current strokes framed on the ink box of `letter`.
    pub fn export_document_for(&self, letter: &str) -> String {
        let view_box = default_horizontal_box(letter, self.config.canvas_width);
        export_svg(&self.strokes, self.canvas_size(), Some(view_box))
    }

    /// Replace everything with the strokes of an SVG document.
    ///
    /// Returns the number of strokes read.
    pub fn load_svg(&mut self, text: &str) -> usize {
        self.reset();
        self.strokes = parse_svg(text);
        self.strokes.len()
    }

    /// Empty the editor: strokes, history, selection, groups and gesture.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.history.clear();
        self.selection.clear();
        self.groups.clear();
        self.clear_transient();
    }

    /// Start loading a document; earlier tickets become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Complete a load started with [`begin_load`](Self::begin_load).
    ///
    /// A missing document or a failed fetch leaves the editor empty.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: StorageResult<Vec<u8>>) -> LoadOutcome {
        if ticket.0 != self.load_generation {
            log::debug!("Dropping superseded load {}", ticket.0);
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) if text.trim().is_empty() => {
                    self.reset();
                    LoadOutcome::Empty
                }
                Ok(text) => match self.load_svg(&text) {
                    0 => {
                        log::warn!("Stored glyph {:?} has no readable strokes", self.letter);
                        LoadOutcome::Empty
                    }
                    count => {
                        log::info!("Loaded glyph {:?} with {} strokes", self.letter, count);
                        LoadOutcome::Loaded { strokes: count }
                    }
                },
                Err(e) => {
                    log::warn!("Stored glyph {:?} is not UTF-8, starting empty: {}", self.letter, e);
                    self.reset();
                    LoadOutcome::Failed
                }
            },
            Err(StorageError::NotFound(_)) => {
                self.reset();
                LoadOutcome::Empty
            }
            Err(e) => {
                log::warn!("Failed to load glyph {:?}, starting empty: {}", self.letter, e);
                self.reset();
                LoadOutcome::Failed
            }
        }
    }

    // ---------- helpers ----------

    fn expanded_group_of(&self, id: StrokeId) -> Selection {
        expand_selection(&Selection::from([id]), &self.groups)
    }

    fn prune_groups(&mut self) {
        let existing: HashSet<StrokeId> = self.strokes.iter().map(|s| s.id).collect();
        self.groups.prune(&existing);
    }

    fn clear_transient(&mut self) {
        self.interaction = Interaction::Idle;
        self.canvas_press = None;
    }
}

/// Copy of `strokes` with the selected ones moved by `delta`.
fn translated(strokes: &[Stroke], selection: &Selection, delta: Vec2) -> Vec<Stroke> {
    strokes
        .iter()
        .map(|s| {
            let mut s = s.clone();
            if selection.contains(&s.id) {
                s.translate(delta);
            }
            s
        })
        .collect()
}
