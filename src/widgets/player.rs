//! Music player widget: playlist browsing over `GET /api/music/list`.
//!
//! Audio output is not handled here; the widget keeps the playlist, the
//! current selection and the volume level. Selection wraps in both
//! directions. The last selected index and the volume are remembered per
//! cell under `wd.widget.player.lastIndex.<cell>` and
//! `wd.widget.player.volume.<cell>`.

use super::refresh::{read, slot, FetchState, Refresher, Slot};
use super::{state_key, Widget, WidgetContext};
use crate::store::{lock, SharedStore};
use crossterm::event::{KeyCode, KeyEvent};
use dashboard_services::{ServiceClient, Track, TrackList};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Registered type name.
pub const TYPE: &str = "player";

/// Volume change per key press.
const VOLUME_STEP: f64 = 0.05;

/// Playlist rows shown below the current track.
const VISIBLE_TRACKS: usize = 8;

/// Playlist widget.
pub struct PlayerWidget {
    cell_index: usize,
    store: SharedStore,
    slot: Slot<TrackList>,
    refresher: Option<Refresher>,
    index: usize,
    volume: f64,
}

impl PlayerWidget {
    /// Creates the widget, restoring its saved selection and volume, and
    /// starts loading the playlist when a client is given.
    pub fn new(context: &WidgetContext, store: SharedStore, client: Option<ServiceClient>) -> Self {
        let slot = slot();
        let refresher = client.map(|client| {
            Refresher::spawn(TYPE, None, slot.clone(), move || {
                client.music_list().map_err(|e| e.to_string())
            })
        });
        Self::with_slot(context.cell_index, store, slot, refresher)
    }

    fn with_slot(
        cell_index: usize,
        store: SharedStore,
        slot: Slot<TrackList>,
        refresher: Option<Refresher>,
    ) -> Self {
        let index = read_saved(&store, "lastIndex", cell_index)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let volume = read_saved(&store, "volume", cell_index)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map_or(1.0, |v| v.clamp(0.0, 1.0));
        Self {
            cell_index,
            store,
            slot,
            refresher,
            index,
            volume,
        }
    }

    /// Tracks loaded so far; empty until the playlist arrives.
    pub fn tracks(&self) -> Vec<Track> {
        match &*read(&self.slot) {
            FetchState::Ready(list) => list.tracks.clone(),
            _ => Vec::new(),
        }
    }

    /// Index of the selected track within the loaded playlist.
    pub fn current_index(&self) -> Option<usize> {
        let len = self.track_count();
        (len > 0).then(|| self.index % len)
    }

    /// Selected track, if the playlist is loaded and non-empty.
    pub fn current_track(&self) -> Option<Track> {
        let index = self.current_index()?;
        self.tracks().get(index).cloned()
    }

    /// Current volume in `0.0..=1.0`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Selects track `index`, wrapping around the playlist in either direction.
    pub fn select(&mut self, index: isize) {
        let len = self.track_count();
        if len == 0 {
            return;
        }
        let wrapped = index.rem_euclid(len as isize) as usize;
        self.index = wrapped;
        self.save("lastIndex", &wrapped.to_string());
    }

    /// Moves to the next track.
    pub fn next(&mut self) {
        if let Some(i) = self.current_index() {
            self.select(i as isize + 1);
        }
    }

    /// Moves to the previous track.
    pub fn previous(&mut self) {
        if let Some(i) = self.current_index() {
            self.select(i as isize - 1);
        }
    }

    /// Sets the volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.save("volume", &format!("{:.2}", self.volume));
    }

    fn track_count(&self) -> usize {
        match &*read(&self.slot) {
            FetchState::Ready(list) => list.tracks.len(),
            _ => 0,
        }
    }

    fn save(&self, field: &str, value: &str) {
        let key = state_key(TYPE, field, self.cell_index);
        if let Err(e) = lock(&self.store).set(&key, value) {
            tracing::warn!(key = %key, "failed to save player state: {e}");
        }
    }
}

impl Widget for PlayerWidget {
    fn widget_type(&self) -> &'static str {
        TYPE
    }

    fn title(&self) -> &str {
        "Music"
    }

    fn render(&self, width: u16) -> Vec<Line<'static>> {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let tracks = match &*read(&self.slot) {
            FetchState::Loading => return vec![Line::styled("Loading playlist…", dim)],
            FetchState::Failed(message) => {
                return vec![
                    Line::styled("No tracks", Style::default().add_modifier(Modifier::BOLD)),
                    Line::styled(
                        format!("Playlist error: {message}"),
                        Style::default().fg(Color::Red),
                    ),
                ];
            }
            FetchState::Ready(list) => list.tracks.clone(),
        };
        if tracks.is_empty() {
            return vec![
                Line::styled("No tracks", Style::default().add_modifier(Modifier::BOLD)),
                Line::styled("Add audio files to the media folder", dim),
            ];
        }

        let current = self.index % tracks.len();
        let mut lines = vec![
            Line::styled(
                tracks[current].display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(vec![
                Span::styled("Vol ", dim),
                Span::raw(volume_bar(self.volume, 10)),
                Span::styled(format!(" {:>3.0}%", self.volume * 100.0), dim),
            ]),
        ];

        let max_name = usize::from(width).saturating_sub(3);
        let start = current.saturating_sub(VISIBLE_TRACKS / 2);
        for (i, track) in tracks.iter().enumerate().skip(start).take(VISIBLE_TRACKS) {
            let name: String = track.display_name().chars().take(max_name).collect();
            if i == current {
                lines.push(Line::styled(
                    format!("▶ {name}"),
                    Style::default().fg(Color::Cyan),
                ));
            } else {
                lines.push(Line::raw(format!("  {name}")));
            }
        }
        lines
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('n') | KeyCode::Right => self.next(),
            KeyCode::Char('p') | KeyCode::Left => self.previous(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_volume(self.volume + VOLUME_STEP),
            KeyCode::Char('-') => self.set_volume(self.volume - VOLUME_STEP),
            KeyCode::Char('r') => {
                if let Some(refresher) = &self.refresher {
                    refresher.refresh_now();
                }
            }
            _ => return false,
        }
        true
    }

    fn teardown(&mut self) {
        if let Some(refresher) = self.refresher.as_mut() {
            refresher.cancel();
        }
    }
}

fn read_saved(store: &SharedStore, field: &str, cell_index: usize) -> Option<String> {
    lock(store)
        .get(&state_key(TYPE, field, cell_index))
        .unwrap_or_else(|e| {
            tracing::warn!("failed to read player state: {e}");
            None
        })
}

fn volume_bar(volume: f64, width: usize) -> String {
    let filled = (volume * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
