//! Static chrome: header, intro copy, feature cards, banners and footer

use chrono::{Datelike, Local};
use iced::widget::{column, container, horizontal_space, row, text};
use iced::{Alignment, Background, Border, Color, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::Message;

const MUTED: Color = iced::color!(0x94, 0xa3, 0xb8);
const ACCENT: Color = iced::color!(0x60, 0xa5, 0xfa);
const DANGER: Color = iced::color!(0xf8, 0x71, 0x71);

/// Short feature blurbs shown under the upload zone
const FEATURES: [(&str, &str); 3] = [
    ("AI Powered", "Uses Gemini 2.5 Flash for intelligent context awareness."),
    ("High Quality", "Preserves original resolution and details."),
    ("Secure", "Images are processed in memory and not stored."),
];

fn panel(background: Color, border: Color, radius: f32) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(background)),
        border: Border {
            color: border,
            width: 1.0,
            radius: radius.into(),
        },
        ..container::Style::default()
    }
}

fn badge<'a>(label: &'a str, color: Color) -> Element<'a, Message> {
    container(text(label).size(11).color(color))
        .padding([2, 8])
        .style(panel(
            Color { a: 0.1, ..color },
            Color { a: 0.3, ..color },
            8.0,
        ))
        .into()
}

/// Top bar with the product name
pub fn header<'a>() -> Element<'a, Message> {
    let brand = row![
        text("ClearView AI").size(20),
        badge("BETA", ACCENT),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let bar = row![
        brand,
        horizontal_space(),
        badge("✦ Powered by Gemini 2.5", Color::from_rgb8(0xa5, 0xb4, 0xfc)),
    ]
    .align_y(Alignment::Center)
    .padding([0, 24]);

    container(bar)
        .width(Length::Fill)
        .height(Length::Fixed(64.0))
        .center_y(Length::Fixed(64.0))
        .style(panel(
            Color::from_rgba8(0x0f, 0x17, 0x2a, 0.9),
            Color::from_rgb8(0x1e, 0x29, 0x3b),
            0.0,
        ))
        .into()
}

/// Headline shown before anything is uploaded
pub fn intro<'a>() -> Element<'a, Message> {
    column![
        text("Remove Watermarks in Seconds").size(44).color(ACCENT),
        text(
            "Use advanced AI to automatically detect and erase watermarks, logos, and unwanted \
             text from your images while perfectly reconstructing the background."
        )
        .size(17)
        .color(MUTED),
    ]
    .spacing(16)
    .max_width(720)
    .align_x(Alignment::Center)
    .into()
}

/// Three feature cards that wrap on narrow windows
pub fn features<'a>() -> Element<'a, Message> {
    let cards = FEATURES
        .iter()
        .map(|(title, description)| {
            container(
                column![
                    text(*title).size(16),
                    text(*description).size(13).color(MUTED),
                ]
                .spacing(8),
            )
            .width(Length::Fixed(232.0))
            .padding(24)
            .style(panel(
                Color::from_rgba8(0x1e, 0x29, 0x3b, 0.5),
                Color::from_rgba8(0x33, 0x41, 0x55, 0.5),
                16.0,
            ))
            .into()
        })
        .collect();

    Wrap::with_elements(cards)
        .spacing(Pixels(24.0))
        .line_spacing(Pixels(24.0))
        .into()
}

/// Spinner line shown while the remote call is in flight
pub fn processing_indicator<'a>() -> Element<'a, Message> {
    column![
        text("⟳ Processing image...").size(16).color(ACCENT),
        text("This usually takes 5-10 seconds.").size(13).color(MUTED),
    ]
    .spacing(6)
    .align_x(Alignment::Center)
    .into()
}

/// Red banner for session errors and download failures
pub fn error_banner(message: &str) -> Element<'_, Message> {
    container(
        row![text("⚠").color(DANGER), text(message).color(DANGER)]
            .spacing(12)
            .align_y(Alignment::Center),
    )
    .padding(16)
    .max_width(768)
    .width(Length::Fill)
    .style(panel(
        Color { a: 0.1, ..DANGER },
        Color { a: 0.2, ..DANGER },
        12.0,
    ))
    .into()
}

/// Neutral one-line notice, e.g. where a download was saved
pub fn notice(message: &str) -> Element<'_, Message> {
    text(message).size(13).color(MUTED).into()
}

/// Copyright line with the current year
pub fn footer<'a>() -> Element<'a, Message> {
    container(
        text(format!("© {} ClearView AI. All rights reserved.", Local::now().year()))
            .size(13)
            .color(Color::from_rgb8(0x64, 0x74, 0x8b)),
    )
    .width(Length::Fill)
    .padding(24)
    .center_x(Length::Fill)
    .style(panel(
        Color::from_rgb8(0x0f, 0x17, 0x2a),
        Color::from_rgb8(0x1e, 0x29, 0x3b),
        0.0,
    ))
    .into()
}
