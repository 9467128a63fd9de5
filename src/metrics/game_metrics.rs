/// Per-process statistics across games. Nothing is written to disk.
pub struct GameMetrics {
    pub high_score: u32,
    pub longest_time: u64,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            high_score: 0,
            longest_time: 0,
            games_played: 0,
        }
    }

    pub fn on_game_over(&mut self, final_score: u32, elapsed_seconds: u64) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        if elapsed_seconds > self.longest_time {
            self.longest_time = elapsed_seconds;
        }
    }

    pub fn format_time(total_secs: u64) -> String {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
