/// One step of the fixed five-step journey. Ordering follows declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Intro,
    Chapter1,
    Chapter2,
    Chapter3,
    Finale,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Intro,
        Stage::Chapter1,
        Stage::Chapter2,
        Stage::Chapter3,
        Stage::Finale,
    ];

    /// The only stage reachable from `self`; `None` for the finale.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Intro => Some(Stage::Chapter1),
            Stage::Chapter1 => Some(Stage::Chapter2),
            Stage::Chapter2 => Some(Stage::Chapter3),
            Stage::Chapter3 => Some(Stage::Finale),
            Stage::Finale => None,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Heading shown above the story panel.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Intro => "INTRO",
            Stage::Chapter1 => "CHAPTER 1 LOGIC",
            Stage::Chapter2 => "CHAPTER 2 MAZE",
            Stage::Chapter3 => "CHAPTER 3 MEMORY",
            Stage::Finale => "FINALE",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
