use iced::widget::image::Handle;
use iced::widget::{
    Column, Row, Space, button, column, container, image, mouse_area, row,
    scrollable, stack, text,
};
use iced::{Alignment, ContentFit, Element, Length};
use vitrine_core::gallery::Thumbnail;
use vitrine_core::transition::SlideBinding;
use vitrine_model::Direction;

use crate::messages::Message;
use crate::state::{Page, State, ViewerState};

const THUMBNAIL_WIDTH: f32 = 220.0;
const THUMBNAIL_HEIGHT: f32 = 150.0;
const GRID_SPACING: f32 = 16.0;
const GRID_PADDING: f32 = 24.0;

pub fn view(state: &State) -> Element<'_, Message> {
    match (&state.page, &state.viewer) {
        (Page::Viewer, Some(viewer)) => viewer_page(viewer),
        _ => index_page(state),
    }
}

fn index_page(state: &State) -> Element<'_, Message> {
    let engaged = state.engagement.is_engaged();
    let title_size = if engaged { 18.0 } else { 32.0 };
    let header = container(
        row![
            text("Vitrine").size(title_size),
            Space::new().width(Length::Fill),
            text(format!("{} slides", state.session.total())).size(14),
        ]
        .align_y(Alignment::Center),
    )
    .padding(if engaged { [8, 24] } else { [24, 24] })
    .width(Length::Fill);

    let body: Element<'_, Message> = match &state.index.thumbnails {
        Some(thumbnails) => {
            scrollable(thumbnail_grid(thumbnails, state.window_size.width))
                .on_scroll(Message::IndexScrolled)
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        }
        None => container(text("Loading collection..."))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    column![header, body].into()
}

fn columns_for(width: f32) -> usize {
    let usable = (width - 2.0 * GRID_PADDING + GRID_SPACING).max(0.0);
    ((usable / (THUMBNAIL_WIDTH + GRID_SPACING)).floor() as usize).max(1)
}

fn thumbnail_grid(thumbnails: &[Thumbnail], width: f32) -> Element<'_, Message> {
    let columns = columns_for(width);
    let mut grid = Column::new().spacing(GRID_SPACING).padding(GRID_PADDING);

    for chunk in thumbnails.chunks(columns) {
        let mut line = Row::new().spacing(GRID_SPACING);
        for thumbnail in chunk {
            line = line.push(thumbnail_tile(thumbnail));
        }
        grid = grid.push(line);
    }

    grid.width(Length::Fill).into()
}

fn thumbnail_tile(thumbnail: &Thumbnail) -> Element<'_, Message> {
    let preview = image(Handle::from_path(&thumbnail.location))
        .content_fit(ContentFit::Cover)
        .width(Length::Fixed(THUMBNAIL_WIDTH))
        .height(Length::Fixed(THUMBNAIL_HEIGHT));

    button(column![preview, text(&thumbnail.alt).size(13)].spacing(6))
        .on_press(Message::OpenSlide(thumbnail.slide))
        .padding(4)
        .style(button::text)
        .into()
}

fn viewer_page(viewer: &ViewerState) -> Element<'_, Message> {
    let width = viewer.strip.panel_width();

    let strip: Element<'_, Message> = match &viewer.frame {
        Some(frame) => row![
            panel(&frame.previous, width),
            panel(&frame.current, width),
            panel(&frame.next, width),
        ]
        .into(),
        None => container(text("Loading..."))
            .width(Length::Fixed(width))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fill)
            .into(),
    };

    let strip = scrollable(strip)
        .id(viewer.strip.scrollable_id.clone())
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(0).scroller_width(0),
        ))
        .width(Length::Fill)
        .height(Length::Fill);

    let surface = mouse_area(strip)
        .on_move(|point| Message::PointerMoved(point.x))
        .on_press(Message::PointerPressed)
        .on_release(Message::PointerReleased);

    let counter = viewer
        .frame
        .as_ref()
        .map(|frame| frame.counter.to_string())
        .unwrap_or_default();

    let controls = column![
        row![
            Space::new().width(Length::Fill),
            button(text("Close")).on_press(Message::Exit).padding([6, 12]),
        ]
        .padding(16),
        row![
            arrow("<", Direction::Backward),
            Space::new().width(Length::Fill),
            arrow(">", Direction::Forward),
        ]
        .align_y(Alignment::Center)
        .padding(16)
        .height(Length::Fill),
        container(text(counter).size(16))
            .center_x(Length::Fill)
            .padding(16),
    ];

    stack![surface, controls].into()
}

fn arrow(label: &str, direction: Direction) -> Element<'_, Message> {
    button(text(label).size(28))
        .on_press(Message::Navigate(direction))
        .padding([8, 14])
        .into()
}

fn panel(binding: &SlideBinding<Handle>, width: f32) -> Element<'_, Message> {
    let content: Element<'_, Message> = match &binding.image {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text(format!("Slide {}", binding.slide)).size(20).into(),
    };

    container(content)
        .width(Length::Fixed(width))
        .height(Length::Fill)
        .center_x(Length::Fixed(width))
        .center_y(Length::Fill)
        .into()
}
