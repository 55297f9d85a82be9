//! Choice sets offered to the player between battles.
//!
//! A [`ChoiceSet`] is always normalized and never empty. Where the set comes
//! from is up to a [`ChoiceSource`]; the flow only asks for a refresh when it
//! re-enters the choice phase.

use std::borrow::Cow;

use crate::action::{Action, ActionProfile};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("choice index {index} out of range ({len} choices)")]
    InvalidIndex { index: usize, len: usize },
}

impl GameError for ChoiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "CHOICE_INVALID_INDEX"
    }
}

/// One selectable card.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceCard {
    pub label: Option<String>,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceSet {
    cards: Vec<ChoiceCard>,
}

impl ChoiceSet {
    pub const STANDARD_LABELS: [&'static str; 3] = ["Safe", "Steady", "Gamble"];

    /// Normalizes `profiles` into cards without labels.
    ///
    /// An empty input yields a single default card.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a ActionProfile>) -> Self {
        Self::from_cards(
            profiles
                .into_iter()
                .map(|profile| ChoiceCard {
                    label: None,
                    action: profile.normalize(),
                })
                .collect(),
        )
    }

    pub fn from_cards(mut cards: Vec<ChoiceCard>) -> Self {
        if cards.is_empty() {
            cards.push(ChoiceCard {
                label: None,
                action: Action::default(),
            });
        }
        Self { cards }
    }

    /// Three default cards labeled with [`Self::STANDARD_LABELS`].
    pub fn standard() -> Self {
        Self::from_cards(
            Self::STANDARD_LABELS
                .iter()
                .map(|label| ChoiceCard {
                    label: Some((*label).to_owned()),
                    action: Action::default(),
                })
                .collect(),
        )
    }

    /// Assigns labels in order; extra labels are ignored.
    #[must_use]
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        for (card, label) in self.cards.iter_mut().zip(labels) {
            card.label = Some(label.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// A normalized set holds at least one card, so this is false.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.cards.len()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.cards.get(index).map(|card| &card.action)
    }

    /// Display label, falling back to `"Action {n}"` (1-indexed) for blank or
    /// missing labels.
    pub fn label(&self, index: usize) -> Cow<'_, str> {
        match self.cards.get(index).and_then(|card| card.label.as_deref()) {
            Some(label) if !label.trim().is_empty() => Cow::Borrowed(label),
            _ => Cow::Owned(format!("Action {}", index + 1)),
        }
    }

    pub fn select(&self, index: usize) -> Result<Action, ChoiceError> {
        self.get(index).copied().ok_or(ChoiceError::InvalidIndex {
            index,
            len: self.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoiceCard> {
        self.cards.iter()
    }
}

impl Default for ChoiceSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Supplies the player's options and regenerates them on request.
pub trait ChoiceSource: Send {
    fn choices(&self) -> &ChoiceSet;

    /// Called when the flow re-enters the choice phase.
    fn refresh(&mut self);
}

/// A fixed set of choices; refreshing keeps the same cards.
#[derive(Clone, Debug, Default)]
pub struct StaticChoices {
    set: ChoiceSet,
}

impl StaticChoices {
    pub fn new(set: ChoiceSet) -> Self {
        Self { set }
    }
}

impl ChoiceSource for StaticChoices {
    fn choices(&self) -> &ChoiceSet {
        &self.set
    }

    fn refresh(&mut self) {}
}

/// Builds a new set from a generator on every refresh.
pub struct GeneratedChoices<F> {
    generate: F,
    set: ChoiceSet,
}

impl<F> GeneratedChoices<F>
where
    F: FnMut() -> ChoiceSet + Send,
{
    pub fn new(mut generate: F) -> Self {
        let set = generate();
        Self { generate, set }
    }
}

impl<F> ChoiceSource for GeneratedChoices<F>
where
    F: FnMut() -> ChoiceSet + Send,
{
    fn choices(&self) -> &ChoiceSet {
        &self.set
    }

    fn refresh(&mut self) {
        self.set = (self.generate)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Effect;

    #[test]
    fn empty_profiles_yield_one_default_card() {
        let set = ChoiceSet::from_profiles(&[]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0), Some(&Action::default()));
    }

    #[test]
    fn profiles_are_normalized() {
        let profiles = [ActionProfile::new(4.0), ActionProfile::new(-1.0).on_failure(Effect::on_actor(-2))];
        let set = ChoiceSet::from_profiles(&profiles);
        for card in set.iter() {
            assert!((0.0..=1.0).contains(&card.action.success_chance()));
        }
        assert_eq!(set.get(0).unwrap().on_success(), Effect::NONE);
        assert_eq!(set.get(1).unwrap().on_failure(), Effect::on_actor(-2));
    }

    #[test]
    fn labels_fall_back_to_numbered_names() {
        let set = ChoiceSet::from_profiles(&[ActionProfile::default(), ActionProfile::default()])
            .with_labels(["  "]);
        assert_eq!(set.label(0), "Action 1");
        assert_eq!(set.label(1), "Action 2");
        assert_eq!(ChoiceSet::standard().label(2), "Gamble");
    }

    #[test]
    fn select_rejects_out_of_range() {
        let set = ChoiceSet::standard();
        assert!(set.select(2).is_ok());
        assert_eq!(set.select(3), Err(ChoiceError::InvalidIndex { index: 3, len: 3 }));
    }

    #[test]
    fn generated_source_rebuilds_on_refresh() {
        let mut calls = 0u32;
        let mut source = GeneratedChoices::new(move || {
            calls += 1;
            ChoiceSet::from_profiles(&[ActionProfile::new(calls as f32 / 10.0)])
        });
        assert!((source.choices().get(0).unwrap().success_chance() - 0.1).abs() < 1e-6);
        source.refresh();
        assert!((source.choices().get(0).unwrap().success_chance() - 0.2).abs() < 1e-6);
    }
}
