//! Pure mapping from catalog data plus selection state to what is displayed.

use crate::types::{Episode, Show};

/// The visible subset of a list, in source order, plus the source length.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a, T> {
    /// `(index in the source list, item)` for each visible item.
    items: Vec<(usize, &'a T)>,
    /// Length of the unfiltered source list.
    pub total_count: usize,
}

impl<'a, T> Projection<'a, T> {
    /// Visible items in display order.
    pub fn visible(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().map(|(_, item)| *item)
    }

    /// Visible items with their index in the source list.
    pub fn entries(&self) -> &[(usize, &'a T)] {
        &self.items
    }

    /// Source-list index of the visible row at `row`.
    pub fn source_index(&self, row: usize) -> Option<usize> {
        self.items.get(row).map(|(i, _)| *i)
    }

    /// Item at visible row `row`.
    pub fn get(&self, row: usize) -> Option<&'a T> {
        self.items.get(row).map(|(_, item)| *item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Projection<'_, Episode> {
    /// "Displaying X / Y episodes".
    pub fn count_label(&self) -> String {
        format!("Displaying {} / {} episodes", self.len(), self.total_count)
    }
}

impl Projection<'_, Show> {
    /// "Displaying N shows".
    pub fn count_label(&self) -> String {
        format!("Displaying {} shows", self.len())
    }
}

/// Project an episode list through the current filter and selection.
///
/// A selected index wins over the filter term. Otherwise an episode is
/// visible when its name or summary contains `filter_term`, ignoring case;
/// an empty term shows everything. `total_count` is always the full length.
///
/// # Examples
///
/// ```
/// use episode_browser::projection::project;
/// use episode_browser::types::Episode;
///
/// let episodes = vec![
///     Episode { season: 1, number: 1, name: "Pilot".into(), summary: Some("A start".into()), image_url: None },
///     Episode { season: 1, number: 2, name: "Second".into(), summary: Some("continues".into()), image_url: None },
/// ];
///
/// let view = project(&episodes, "start", None);
/// assert_eq!(view.count_label(), "Displaying 1 / 2 episodes");
///
/// let view = project(&episodes, "start", Some(1));
/// assert_eq!(view.get(0).unwrap().name, "Second");
/// ```
pub fn project<'a>(
    episodes: &'a [Episode],
    filter_term: &str,
    selected: Option<usize>,
) -> Projection<'a, Episode> {
    let items = match selected {
        Some(index) => episodes
            .get(index)
            .map(|ep| vec![(index, ep)])
            .unwrap_or_default(),
        None => episodes
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.matches(filter_term))
            .collect(),
    };

    Projection {
        items,
        total_count: episodes.len(),
    }
}

/// Project the show listing. Shows are never filtered, only listed.
pub fn project_shows(shows: &[Show]) -> Projection<'_, Show> {
    Projection {
        items: shows.iter().enumerate().collect(),
        total_count: shows.len(),
    }
}
