use super::ScreenRect;

/// Horizontal slider over `min..=max`, laid out in physical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    value: f32,
    /// Whole interactive row; the track runs along its vertical center.
    pub rect: ScreenRect,
}

impl Slider {
    pub const KNOB_WIDTH: f32 = 10.0;
    pub const TRACK_HEIGHT: f32 = 6.0;

    pub fn new(label: &'static str, min: f32, max: f32, value: f32, rect: ScreenRect) -> Self {
        let mut slider = Self {
            label,
            min,
            max,
            value: min,
            rect,
        };
        slider.set_value(value);
        slider
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the value, clamped to the slider range. Returns whether it changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let clamped = value.clamp(self.min, self.max);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }

    /// Fraction of the range covered by the current value, 0..=1.
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / span
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }

    /// Value under horizontal position `x`, clamped at both ends of the track.
    pub fn value_at(&self, x: f32) -> f32 {
        let width = self.rect.w.max(1.0);
        let t = ((x - self.rect.x) / width).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }

    /// Track, filled part and knob, back to front.
    pub fn rects(&self) -> [ScreenRect; 3] {
        let r = self.rect;
        let track_y = r.y + (r.h - Self::TRACK_HEIGHT) * 0.5;
        let track = ScreenRect::new(r.x, track_y, r.w, Self::TRACK_HEIGHT);
        let fill = ScreenRect::new(r.x, track_y, r.w * self.fraction(), Self::TRACK_HEIGHT);
        let knob_x = r.x + r.w * self.fraction() - Self::KNOB_WIDTH * 0.5;
        let knob = ScreenRect::new(knob_x, r.y, Self::KNOB_WIDTH, r.h);
        [track, fill, knob]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> Slider {
        Slider::new("s", 1.0, 16.0, 1.0, ScreenRect::new(100.0, 50.0, 150.0, 20.0))
    }

    #[test]
    fn value_maps_linearly_across_track() {
        let s = slider();
        assert_eq!(s.value_at(100.0), 1.0);
        assert_eq!(s.value_at(250.0), 16.0);
        assert_eq!(s.value_at(175.0), 8.5);
    }

    #[test]
    fn positions_outside_track_clamp() {
        let s = slider();
        assert_eq!(s.value_at(0.0), 1.0);
        assert_eq!(s.value_at(1000.0), 16.0);
    }

    #[test]
    fn set_value_clamps_and_reports_change() {
        let mut s = slider();
        assert!(!s.set_value(1.0));
        assert!(s.set_value(40.0));
        assert_eq!(s.value(), 16.0);
        assert_eq!(s.fraction(), 1.0);
    }

    #[test]
    fn knob_sits_at_value() {
        let mut s = Slider::new("pan", -1.0, 1.0, 0.0, ScreenRect::new(0.0, 0.0, 200.0, 20.0));
        let [track, fill, knob] = s.rects();
        assert_eq!(track.w, 200.0);
        assert_eq!(fill.w, 100.0);
        assert_eq!(knob.x + knob.w * 0.5, 100.0);

        s.set_value(-1.0);
        assert_eq!(s.rects()[1].w, 0.0);
    }

    #[test]
    fn hit_test_uses_row_rect() {
        let s = slider();
        assert!(s.contains(120.0, 60.0));
        assert!(!s.contains(120.0, 80.0));
        assert!(!s.contains(99.0, 60.0));
    }
}
