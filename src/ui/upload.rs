//! Drop zone shown while no session exists
//!
//! Clicking opens the file picker; files dropped anywhere on the window
//! are handled by the application subscription.

use iced::widget::{column, container, mouse_area, text};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};

use crate::Message;

const IDLE_BORDER: Color = iced::color!(0x47, 0x55, 0x69);
const ACTIVE_BORDER: Color = iced::color!(0x3b, 0x82, 0xf6);

/// The upload zone
///
/// `busy` disables picking while a file is being read.
/// `hovered` highlights the zone while files are dragged over the window.
pub fn view<'a>(busy: bool, hovered: bool) -> Element<'a, Message> {
    let title = if busy {
        "Loading..."
    } else {
        "Click or Drag to Upload Image"
    };

    let mut content = column![
        text(if busy { "⏳" } else { "⬆" }).size(40),
        text(title).size(22),
        text("Supports JPG, PNG, WEBP. High resolution images are optimized for editing.")
            .size(14)
            .color(Color::from_rgb8(0x94, 0xa3, 0xb8)),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    if !busy {
        content = content.push(
            text("Max file size: 10MB")
                .size(12)
                .color(Color::from_rgb8(0x64, 0x74, 0x8b)),
        );
    }

    let highlight = hovered && !busy;
    let zone = container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(384.0))
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(if highlight {
                Color::from_rgba8(0x1e, 0x29, 0x3b, 0.8)
            } else {
                Color::from_rgba8(0x1e, 0x29, 0x3b, 0.3)
            })),
            border: Border {
                color: if highlight { ACTIVE_BORDER } else { IDLE_BORDER },
                width: 2.0,
                radius: 16.0.into(),
            },
            ..container::Style::default()
        });

    let area = mouse_area(zone);
    if busy {
        area.into()
    } else {
        area.on_press(Message::PickImage).into()
    }
}
