//! Before/after comparator
//!
//! A canvas draws the original image and, once processing succeeded, the
//! cleaned image on top of it clipped to the left of a draggable divider.

use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::widget::image::Handle;
use iced::widget::{button, canvas as canvas_widget, column, container, horizontal_space, row, text};
use iced::{Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Theme};

use crate::state::data::ImageAsset;
use crate::Message;

const BACKDROP: Color = iced::color!(0x02, 0x06, 0x17);
const DIVIDER: Color = iced::color!(0x3b, 0x82, 0xf6);
const VIEWPORT_HEIGHT: f32 = 560.0;

/// Slider position in percent for a pointer at `x`, given the canvas bounds
///
/// The pointer is clamped to the canvas so the result stays in `[0, 100]`.
pub fn slider_position(x: f32, bounds: Rectangle) -> f32 {
    if bounds.width <= 0.0 {
        return 0.0;
    }
    let offset = (x - bounds.x).clamp(0.0, bounds.width);
    offset / bounds.width * 100.0
}

/// Largest rectangle with the image's aspect ratio that fits `area`, centred
pub fn fit_contain(image: Size, area: Size) -> Rectangle {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rectangle::new(Point::ORIGIN, area);
    }
    let scale = (area.width / image.width).min(area.height / image.height);
    let size = Size::new(image.width * scale, image.height * scale);

    Rectangle::new(
        Point::new((area.width - size.width) / 2.0, (area.height - size.height) / 2.0),
        size,
    )
}

/// Name offered when saving a cleaned image
pub fn download_file_name(timestamp: i64, mime_type: &str) -> String {
    let extension = match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    };
    format!("cleaned-image-{}.{}", timestamp, extension)
}

/// A decoded image ready for drawing
#[derive(Debug, Clone)]
struct Picture {
    handle: Handle,
    size: Option<Size>,
}

impl Picture {
    fn from_asset(asset: &ImageAsset) -> Result<Self, String> {
        let bytes = asset.bytes().map_err(|e| e.to_string())?;
        Ok(Self {
            handle: Handle::from_bytes(bytes),
            size: asset
                .dimensions()
                .map(|(w, h)| Size::new(w as f32, h as f32)),
        })
    }
}

/// Local UI state of the comparator
#[derive(Debug, Clone)]
pub struct Comparator {
    original: Picture,
    result: Option<Picture>,
    /// Divider position in percent
    slider: f32,
    /// Share confirmation is visible
    copied: bool,
    /// Bumped on every copy so only the latest timer clears the flag
    copy_generation: u64,
}

impl Comparator {
    pub fn new(original: &ImageAsset) -> Result<Self, String> {
        Ok(Self {
            original: Picture::from_asset(original)?,
            result: None,
            slider: 50.0,
            copied: false,
            copy_generation: 0,
        })
    }

    pub fn set_result(&mut self, result: &ImageAsset) -> Result<(), String> {
        self.result = Some(Picture::from_asset(result)?);
        Ok(())
    }

    pub fn slider(&self) -> f32 {
        self.slider
    }

    pub fn set_slider(&mut self, position: f32) {
        self.slider = position.clamp(0.0, 100.0);
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Show the share confirmation; returns the token to pass to `copy_expired`
    pub fn mark_copied(&mut self) -> u64 {
        self.copied = true;
        self.copy_generation += 1;
        self.copy_generation
    }

    pub fn copy_expired(&mut self, generation: u64) {
        if generation == self.copy_generation {
            self.copied = false;
        }
    }

    /// Toolbar, viewport and hint
    pub fn view(&self, is_processing: bool) -> Element<'_, Message> {
        let has_result = self.result.is_some();

        let share = button(text(if self.is_copied() { "✓ Copied" } else { "Share" }))
            .on_press(Message::Share)
            .style(button::text)
            .padding([8, 16]);

        let upload_new = button(text("Upload new image"))
            .on_press_maybe((!is_processing).then_some(Message::Reset))
            .style(button::text)
            .padding([8, 16]);

        let action = if has_result {
            button(text("Download").size(15))
                .on_press(Message::Download)
                .style(button::success)
                .padding([8, 24])
        } else {
            let label = if is_processing { "Processing..." } else { "Remove watermark" };
            button(text(label).size(15))
                .on_press_maybe((!is_processing).then_some(Message::Process))
                .style(button::primary)
                .padding([8, 24])
        };

        let toolbar = row![
            text("Preview").size(16),
            horizontal_space(),
            share,
            upload_new,
            action,
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let viewport = canvas_widget(ComparatorCanvas {
            original: &self.original,
            result: self.result.as_ref(),
            slider: self.slider,
            show_original_label: !is_processing,
        })
        .width(Length::Fill)
        .height(Length::Fixed(VIEWPORT_HEIGHT));

        let mut content = column![toolbar, container(viewport).style(container::bordered_box)]
            .spacing(16)
            .max_width(1024);

        if has_result {
            content = content.push(
                container(text("Drag the slider to compare").size(14))
                    .center_x(Length::Fill),
            );
        }

        content.into()
    }
}

/// Canvas program drawing the two layers and the divider
struct ComparatorCanvas<'a> {
    original: &'a Picture,
    result: Option<&'a Picture>,
    slider: f32,
    show_original_label: bool,
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
}

impl ComparatorCanvas<'_> {
    fn draw_picture(frame: &mut canvas::Frame, picture: &Picture, area: Size) {
        let target = picture
            .size
            .map(|size| fit_contain(size, area))
            .unwrap_or_else(|| Rectangle::new(Point::ORIGIN, area));
        frame.draw_image(target, canvas::Image::new(picture.handle.clone()));
    }

    fn label(frame: &mut canvas::Frame, content: &str, position: Point, color: Color) {
        frame.fill_text(canvas::Text {
            content: content.to_string(),
            position,
            color,
            size: Pixels(13.0),
            ..canvas::Text::default()
        });
    }
}

impl Program<Message> for ComparatorCanvas<'_> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let area = bounds.size();

        frame.fill_rectangle(Point::ORIGIN, area, BACKDROP);
        Self::draw_picture(&mut frame, self.original, area);

        let Some(result) = self.result else {
            if self.show_original_label {
                Self::label(
                    &mut frame,
                    "Original",
                    Point::new(area.width / 2.0 - 24.0, area.height - 28.0),
                    Color::WHITE,
                );
            }
            return vec![frame.into_geometry()];
        };

        let split = area.width * self.slider / 100.0;
        let revealed = Size::new(split, area.height);

        // The cleaned layer only covers the left part of the viewport
        frame.with_clip(Rectangle::new(Point::ORIGIN, revealed), |frame| {
            frame.fill_rectangle(Point::ORIGIN, revealed, BACKDROP);
            Self::draw_picture(frame, result, area);
        });

        Self::label(&mut frame, "Cleaned", Point::new(16.0, area.height - 28.0), DIVIDER);
        Self::label(
            &mut frame,
            "Original",
            Point::new(area.width - 72.0, area.height - 28.0),
            Color::from_rgb8(0xcb, 0xd5, 0xe1),
        );

        frame.stroke(
            &Path::line(Point::new(split, 0.0), Point::new(split, area.height)),
            Stroke::default().with_color(DIVIDER).with_width(3.0),
        );

        let knob = Point::new(split, area.height / 2.0);
        frame.fill(&Path::circle(knob, 18.0), Color::WHITE);
        Self::label(&mut frame, "⇔", Point::new(knob.x - 7.0, knob.y - 9.0), DIVIDER);

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if self.result.is_none() {
            state.is_dragging = false;
            return (canvas::event::Status::Ignored, None);
        }

        let press_at = |position: Point, state: &mut DragState| {
            state.is_dragging = true;
            (
                canvas::event::Status::Captured,
                Some(Message::SliderMoved(slider_position(position.x, bounds))),
            )
        };

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if cursor.is_over(bounds) {
                    if let Some(position) = cursor.position() {
                        return press_at(position, state);
                    }
                }
            }
            canvas::Event::Touch(touch::Event::FingerPressed { position, .. }) => {
                if bounds.contains(position) {
                    return press_at(position, state);
                }
            }

            // Dragging keeps tracking outside the canvas until release
            canvas::Event::Mouse(mouse::Event::CursorMoved { position })
            | canvas::Event::Touch(touch::Event::FingerMoved { position, .. }) => {
                if state.is_dragging {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::SliderMoved(slider_position(position.x, bounds))),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
            | canvas::Event::Touch(touch::Event::FingerLifted { .. })
            | canvas::Event::Touch(touch::Event::FingerLost { .. }) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    return (canvas::event::Status::Captured, None);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if self.result.is_some() && (state.is_dragging || cursor.is_over(bounds)) {
            mouse::Interaction::ResizingHorizontally
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(100.0, 50.0), Size::new(400.0, 300.0))
    }

    #[test]
    fn test_slider_position_inside() {
        assert_eq!(slider_position(100.0, bounds()), 0.0);
        assert_eq!(slider_position(300.0, bounds()), 50.0);
        assert_eq!(slider_position(500.0, bounds()), 100.0);
    }

    #[test]
    fn test_slider_position_clamped() {
        assert_eq!(slider_position(-1000.0, bounds()), 0.0);
        assert_eq!(slider_position(10_000.0, bounds()), 100.0);

        let empty = Rectangle::new(Point::ORIGIN, Size::new(0.0, 0.0));
        assert_eq!(slider_position(10.0, empty), 0.0);
    }

    #[test]
    fn test_fit_contain_wide_image() {
        // 2:1 image in a square area is letterboxed vertically
        let rect = fit_contain(Size::new(200.0, 100.0), Size::new(100.0, 100.0));
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 50.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 25.0);
    }

    #[test]
    fn test_fit_contain_tall_image_upscaled() {
        let rect = fit_contain(Size::new(10.0, 20.0), Size::new(400.0, 200.0));
        assert_eq!(rect.height, 200.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.x, 150.0);
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name(1700000000000, "image/png"), "cleaned-image-1700000000000.png");
        assert_eq!(download_file_name(42, "image/jpeg"), "cleaned-image-42.jpg");
        assert_eq!(download_file_name(42, "image/unknown"), "cleaned-image-42.png");
    }

    #[test]
    fn test_slider_setter_clamps() {
        let asset = ImageAsset::new("orig", "data:image/png;base64,AAAA".into(), "image/png".into(), None);
        let mut comparator = Comparator::new(&asset).unwrap();
        assert_eq!(comparator.slider(), 50.0);

        comparator.set_slider(140.0);
        assert_eq!(comparator.slider(), 100.0);
        comparator.set_slider(-3.0);
        assert_eq!(comparator.slider(), 0.0);
    }

    #[test]
    fn test_copied_flag_uses_latest_timer() {
        let asset = ImageAsset::new("orig", "data:image/png;base64,AAAA".into(), "image/png".into(), None);
        let mut comparator = Comparator::new(&asset).unwrap();

        let first = comparator.mark_copied();
        let second = comparator.mark_copied();

        comparator.copy_expired(first);
        assert!(comparator.is_copied());

        comparator.copy_expired(second);
        assert!(!comparator.is_copied());
    }
}
