//! Server roster view model and reconciliation.
//!
//! Each health poll replaces the roster wholesale; reconciliation turns that
//! into a keyed diff over the displayed cards so per-card display state (the
//! expanded tool list) survives between polls.

use std::collections::{HashMap, HashSet};

use mcphub_core::{Capability, ServerSummary};

/// Shown instead of cards when the roster is empty.
pub const EMPTY_ROSTER_MESSAGE: &str =
    "No servers connected. Start the hub to see MCP servers here.";

/// Tool descriptions longer than this many characters are cut.
pub const DESCRIPTION_LIMIT: usize = 80;

/// Cut `description` to [`DESCRIPTION_LIMIT`] characters, appending `...`.
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

/// One displayed server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCard {
    pub summary: ServerSummary,
    /// Whether the tool list is expanded. Local display state.
    pub tools_expanded: bool,
}

impl ServerCard {
    fn new(summary: ServerSummary) -> Self {
        Self {
            summary,
            tools_expanded: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// Upper-cased display status; `DISABLED` whenever the disabled flag is set.
    pub fn badge(&self) -> String {
        self.summary.display_status().as_str().to_uppercase()
    }

    /// State of the enable switch.
    pub const fn is_enabled(&self) -> bool {
        self.summary.is_enabled()
    }

    pub fn meta_line(&self) -> String {
        format!(
            "Transport: {}    Resources: {}    Prompts: {}",
            self.summary.transport(),
            self.summary.resources.len(),
            self.summary.prompts.len()
        )
    }

    pub fn tools_label(&self) -> String {
        let arrow = if self.tools_expanded { '▾' } else { '▸' };
        format!("Tools ({})  {arrow}", self.summary.tools.len())
    }

    pub fn tools(&self) -> &[Capability] {
        &self.summary.tools
    }
}

/// What a reconciliation pass changed, by server name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// True when no card was created or removed.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Displayed cards, keyed by server name.
///
/// Existing cards keep their position; new cards are appended in roster order.
#[derive(Debug, Clone, Default)]
pub struct RosterView {
    order: Vec<String>,
    cards: HashMap<String, ServerCard>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fresh roster. Later duplicates of a name are ignored.
    pub fn reconcile(&mut self, servers: Vec<ServerSummary>) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut incoming: Vec<ServerSummary> = Vec::with_capacity(servers.len());
        let mut seen = HashSet::with_capacity(servers.len());
        for server in servers {
            if seen.insert(server.name.clone()) {
                incoming.push(server);
            }
        }

        let cards = &mut self.cards;
        self.order.retain(|name| {
            let keep = seen.contains(name);
            if !keep {
                cards.remove(name);
                report.removed.push(name.clone());
            }
            keep
        });

        for summary in incoming {
            if let Some(card) = self.cards.get_mut(&summary.name) {
                report.updated.push(summary.name.clone());
                card.summary = summary;
            } else {
                report.created.push(summary.name.clone());
                self.order.push(summary.name.clone());
                self.cards
                    .insert(summary.name.clone(), ServerCard::new(summary));
            }
        }

        report
    }

    /// Cards in display order.
    pub fn cards(&self) -> impl Iterator<Item = &ServerCard> {
        self.order.iter().filter_map(|name| self.cards.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&ServerCard> {
        self.cards.get(name)
    }

    /// Card at display position `index`.
    pub fn nth(&self, index: usize) -> Option<&ServerCard> {
        self.order.get(index).and_then(|name| self.cards.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Message to show in place of cards, if any.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_ROSTER_MESSAGE)
    }

    /// Expand or collapse a card's tool list. Returns the new state.
    pub fn toggle_tools(&mut self, name: &str) -> Option<bool> {
        let card = self.cards.get_mut(name)?;
        card.tools_expanded = !card.tools_expanded;
        Some(card.tools_expanded)
    }
}
