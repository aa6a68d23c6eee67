use winit::event::{ElementState, MouseButton, WindowEvent};

use super::{Overlay, OverlayFrame, RectBatch, ScreenRect, Slider};

const PANEL_ORIGIN: (f32, f32) = (12.0, 12.0);
const PANEL_PADDING: f32 = 10.0;
const ROW_WIDTH: f32 = 240.0;
const ROW_HEIGHT: f32 = 20.0;
const ROW_GAP: f32 = 12.0;

const PANEL_COLOR: [f32; 4] = [0.08, 0.08, 0.10, 0.80];
const TRACK_COLOR: [f32; 4] = [0.30, 0.30, 0.35, 1.00];
const FILL_COLOR: [f32; 4] = [0.90, 0.60, 0.20, 1.00];
const KNOB_COLOR: [f32; 4] = [0.95, 0.95, 0.95, 1.00];
const ACTIVE_KNOB_COLOR: [f32; 4] = [1.00, 0.80, 0.40, 1.00];

/// Values the tuning panel controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningState {
    /// Anisotropic filtering sample count, 1..=16.
    pub anisotropy: u16,
    /// Horizontal camera offset, -1..=1.
    pub camera_pan: f32,
}

impl Default for TuningState {
    fn default() -> Self {
        Self {
            anisotropy: 1,
            camera_pan: 0.0,
        }
    }
}

const ANISOTROPY: usize = 0;
const CAMERA_PAN: usize = 1;

/// Slider panel for anisotropic filtering and camera panning.
///
/// Input arrives as window events in physical pixels; `state` reports the
/// current values with anisotropy rounded to a whole sample count.
#[derive(Debug)]
pub struct TuningPanel {
    sliders: [Slider; 2],
    cursor: (f32, f32),
    dragging: Option<usize>,
    batch: RectBatch,
}

impl TuningPanel {
    pub fn new(initial: TuningState) -> Self {
        let row = |i: usize| {
            ScreenRect::new(
                PANEL_ORIGIN.0 + PANEL_PADDING,
                PANEL_ORIGIN.1 + PANEL_PADDING + i as f32 * (ROW_HEIGHT + ROW_GAP),
                ROW_WIDTH,
                ROW_HEIGHT,
            )
        };
        Self {
            sliders: [
                Slider::new(
                    "anisotropic filtering",
                    1.0,
                    16.0,
                    f32::from(initial.anisotropy),
                    row(ANISOTROPY),
                ),
                Slider::new("camera panning", -1.0, 1.0, initial.camera_pan, row(CAMERA_PAN)),
            ],
            cursor: (0.0, 0.0),
            dragging: None,
            batch: RectBatch::new(),
        }
    }

    pub fn state(&self) -> TuningState {
        TuningState {
            anisotropy: self.sliders[ANISOTROPY].value().round() as u16,
            camera_pan: self.sliders[CAMERA_PAN].value(),
        }
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    /// Panel background covering every row.
    pub fn bounds(&self) -> ScreenRect {
        let rows = self.sliders.len() as f32;
        ScreenRect::new(
            PANEL_ORIGIN.0,
            PANEL_ORIGIN.1,
            ROW_WIDTH + 2.0 * PANEL_PADDING,
            rows * ROW_HEIGHT + (rows - 1.0) * ROW_GAP + 2.0 * PANEL_PADDING,
        )
    }

    /// Feeds a window event. Returns `true` when the panel consumed it.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press(),
                ElementState::Released => self.release(),
            },
            _ => false,
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) -> bool {
        self.cursor = (x, y);
        let Some(i) = self.dragging else { return false };
        let slider = &mut self.sliders[i];
        let value = slider.value_at(x);
        slider.set_value(value);
        true
    }

    /// Starts dragging the slider under the cursor, jumping it to the cursor.
    pub fn press(&mut self) -> bool {
        let (x, y) = self.cursor;
        let Some(i) = self.sliders.iter().position(|s| s.contains(x, y)) else {
            return self.bounds().contains(x, y);
        };
        self.dragging = Some(i);
        let value = self.sliders[i].value_at(x);
        self.sliders[i].set_value(value);
        true
    }

    pub fn release(&mut self) -> bool {
        self.dragging.take().is_some()
    }

    fn rects(&self) -> Vec<(ScreenRect, [f32; 4])> {
        let mut rects = vec![(self.bounds(), PANEL_COLOR)];
        for (i, slider) in self.sliders.iter().enumerate() {
            let [track, fill, knob] = slider.rects();
            let knob_color = if self.dragging == Some(i) {
                ACTIVE_KNOB_COLOR
            } else {
                KNOB_COLOR
            };
            rects.extend([(track, TRACK_COLOR), (fill, FILL_COLOR), (knob, knob_color)]);
        }
        rects
    }
}

impl Overlay for TuningPanel {
    fn begin_frame(&mut self, frame: &OverlayFrame<'_>) {
        let rects = self.rects();
        self.batch.prepare(frame, &rects);
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.batch.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_center(panel: &TuningPanel, i: usize) -> (f32, f32) {
        let r = panel.sliders()[i].rect;
        (r.x + r.w * 0.5, r.y + r.h * 0.5)
    }

    #[test]
    fn initial_state_round_trips() {
        let initial = TuningState {
            anisotropy: 16,
            camera_pan: -0.5,
        };
        assert_eq!(TuningPanel::new(initial).state(), initial);
    }

    #[test]
    fn out_of_range_initial_values_are_clamped() {
        let panel = TuningPanel::new(TuningState {
            anisotropy: 40,
            camera_pan: 3.0,
        });
        assert_eq!(
            panel.state(),
            TuningState {
                anisotropy: 16,
                camera_pan: 1.0
            }
        );
    }

    #[test]
    fn dragging_moves_only_the_grabbed_slider() {
        let mut panel = TuningPanel::new(TuningState::default());
        let (x, y) = row_center(&panel, CAMERA_PAN);

        assert!(!panel.cursor_moved(x, y));
        assert!(panel.press());
        assert!(panel.state().camera_pan.abs() < 1e-6);

        let right_end = panel.sliders()[CAMERA_PAN].rect.x + ROW_WIDTH;
        // Leaving the row vertically keeps the drag alive.
        assert!(panel.cursor_moved(right_end + 50.0, y + 200.0));
        assert_eq!(panel.state().camera_pan, 1.0);
        assert_eq!(panel.state().anisotropy, 1);

        assert!(panel.release());
        assert!(!panel.cursor_moved(0.0, y));
        assert_eq!(panel.state().camera_pan, 1.0);
    }

    #[test]
    fn anisotropy_snaps_to_whole_samples() {
        let mut panel = TuningPanel::new(TuningState::default());
        let r = panel.sliders()[ANISOTROPY].rect;
        // 1 + 0.52 * 15 = 8.8
        panel.cursor_moved(r.x + r.w * 0.52, r.y + 1.0);
        panel.press();
        assert_eq!(panel.state().anisotropy, 9);
    }

    #[test]
    fn clicks_outside_the_panel_are_not_consumed() {
        let mut panel = TuningPanel::new(TuningState::default());
        panel.cursor_moved(800.0, 600.0);
        assert!(!panel.press());
        assert!(!panel.release());

        // Inside the background but between rows: consumed, nothing moves.
        let b = panel.bounds();
        panel.cursor_moved(b.x + 2.0, b.y + 2.0);
        assert!(panel.press());
        assert_eq!(panel.state(), TuningState::default());
    }

    #[test]
    fn rects_cover_background_and_three_parts_per_slider() {
        let panel = TuningPanel::new(TuningState::default());
        let rects = panel.rects();
        assert_eq!(rects.len(), 1 + 3 * 2);
        assert_eq!(rects[0].0, panel.bounds());
    }
}
