use vidctl_core::ControllerSnapshot;

/// Single-line text field used by the prompt routes
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub buffer: String,
}

impl TextField {
    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Take the typed text, leaving the field empty
    pub fn take(&mut self) -> Option<String> {
        let path = std::mem::take(&mut self.buffer);
        let trimmed = path.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub struct AppState {
    // ==============================
    // Player State
    // ==============================
    /// Latest snapshot published by the controller
    pub player: ControllerSnapshot,
    /// Status message to display
    pub status_message: String,

    // ==============================
    // Prompt State
    // ==============================
    pub path_input: TextField,
    pub seek_input: TextField,
}

/// Where the Go-to prompt should move playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute position in seconds
    Seconds(f64),
    /// Point on the progress bar, `0.0..=1.0`
    Progress(f64),
}

impl SeekTarget {
    /// Parse `90`, `1:30`, `1:02:03` or `45%`
    pub fn parse(input: &str) -> Option<SeekTarget> {
        let input = input.trim();
        if let Some(percent) = input.strip_suffix('%') {
            let value: f64 = percent.trim().parse().ok()?;
            return value
                .is_finite()
                .then(|| SeekTarget::Progress(value / 100.0));
        }

        let mut seconds = 0.0;
        let mut parts = 0;
        for part in input.split(':') {
            let value: f64 = part.trim().parse().ok()?;
            if !value.is_finite() || value < 0.0 {
                return None;
            }
            seconds = seconds * 60.0 + value;
            parts += 1;
        }
        (parts <= 3).then_some(SeekTarget::Seconds(seconds))
    }
}

impl AppState {
    pub fn new(player: ControllerSnapshot) -> Self {
        Self {
            player,
            status_message: "No video loaded. Press O to open one.".to_string(),
            path_input: TextField::default(),
            seek_input: TextField::default(),
        }
    }

    /// Fold a controller snapshot into the view state
    pub fn handle_snapshot(&mut self, snapshot: ControllerSnapshot) {
        let previous = std::mem::replace(&mut self.player, snapshot);
        let current = &self.player;

        if current.source != previous.source {
            self.status_message = match &current.source {
                Some(source) => format!("Loaded: {}", source),
                None => "No video loaded".to_string(),
            };
        } else if current.rate != previous.rate {
            self.status_message = format!("Speed: {}x", current.rate);
        } else if current.paused != previous.paused {
            self.status_message = if current.paused { "Paused" } else { "Playing" }.to_string();
        } else if current.theater != previous.theater {
            self.status_message = if current.theater {
                "Theater mode"
            } else {
                "Default view"
            }
            .to_string();
        }
    }

    /// Get the progress ratio (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        self.player.progress()
    }

    /// `pos / dur` line shown under the progress bar
    pub fn position_label(&self) -> String {
        match self.player.duration {
            Some(duration) => format!(
                "{} / {}",
                Self::format_time(self.player.current_time),
                Self::format_time(duration)
            ),
            None => "--:-- / --:--".to_string(),
        }
    }

    /// Format time as MM:SS
    pub fn format_time(seconds: f64) -> String {
        let seconds = seconds.max(0.0);
        let mins = (seconds / 60.0).floor() as u32;
        let secs = (seconds % 60.0).floor() as u32;
        format!("{:02}:{:02}", mins, secs)
    }
}
