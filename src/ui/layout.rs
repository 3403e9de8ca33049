use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub title: Rect,
    pub fields: [Rect; 3],
    pub result: Rect,
    pub status_bar: Rect,
}

const FORM_WIDTH: u16 = 64;

pub fn compute_layout(area: Rect) -> AppLayout {
    // Main vertical split: content | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let content = main_chunks[0];
    let status_bar = main_chunks[1];

    // Center the form horizontally
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Max(FORM_WIDTH),
            Constraint::Fill(1),
        ])
        .split(content);

    let form = h_chunks[1];

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Country
            Constraint::Length(3), // State
            Constraint::Length(3), // City
            Constraint::Length(2), // Result line
            Constraint::Min(0),
        ])
        .split(form);

    AppLayout {
        title: v_chunks[0],
        fields: [v_chunks[1], v_chunks[2], v_chunks[3]],
        result: v_chunks[4],
        status_bar,
    }
}
