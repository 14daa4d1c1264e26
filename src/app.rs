/// Panel-side view of the session. Mutated only by the event handler, from
/// session events and snapshot responses; no walk logic lives here.
pub struct App {
    pub running: bool,
    pub status_message: String,
    pub links: Vec<String>,
    pub scroll: usize,
    pub seed_url: String,
}

impl App {
    pub fn new(seed_url: String) -> Self {
        Self {
            running: false,
            status_message: String::from("Ready"),
            links: Vec::new(),
            scroll: 0,
            seed_url,
        }
    }

    /// Swap in a fresh snapshot of the visited set.
    pub fn replace_links(&mut self, links: Vec<String>) {
        self.links = links;
        self.scroll = self.scroll.min(self.links.len().saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = (self.scroll + 1).min(self.links.len().saturating_sub(1));
    }
}
