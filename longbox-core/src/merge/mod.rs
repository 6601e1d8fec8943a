//! Multi-source reconciliation engine
//!
//! Applies the sparse overlays contributed by external catalog services onto
//! the canonical model. For every contributed field the configured
//! resolution order is walked from lowest to highest priority, each ranked
//! non-empty value overwriting the previous one. When only unranked services
//! disagree, the operator picks from a menu (or types a replacement); a field
//! nobody contributed is never touched, so applying the same overlays twice
//! is a no-op.

mod overlay;
mod prompt;

pub use overlay::{IssuePatch, Overlay, PublisherPatch, SeriesPatch};
pub use prompt::{ConsoleInput, InputSource, Reply, ScriptedInput};

use crate::error::Result;
use crate::types::{Creator, Format, Genre, Metadata, Role, Source, StoryArc};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// A value the engine can resolve between competing services
///
/// `render` feeds the disambiguation menu; `parse_input` backs the operator's
/// free-text replacement option.
pub trait MergeValue: Clone + PartialEq {
    fn render(&self) -> String;
    fn parse_input(raw: &str) -> Option<Self>;
}

/// Reconciles overlays onto a [`Metadata`] instance
pub struct Reconciler<'a> {
    resolution_order: Vec<Source>,
    input: &'a mut dyn InputSource,
    max_attempts: usize,
}

impl<'a> Reconciler<'a> {
    pub fn new(resolution_order: impl Into<Vec<Source>>, input: &'a mut dyn InputSource) -> Self {
        Self {
            resolution_order: resolution_order.into(),
            input,
            max_attempts: 3,
        }
    }

    /// Apply every overlay onto the metadata
    pub fn apply(&mut self, metadata: &mut Metadata, overlays: &[Overlay]) -> Result<()> {
        // External ids accumulate regardless of field resolution.
        for overlay in overlays {
            if let Some(id) = overlay.publisher.id {
                metadata.publisher.add_source(overlay.source, id);
            }
            if let Some(id) = overlay.series.id {
                metadata.series.add_source(overlay.source, id);
            }
            if let Some(id) = overlay.issue.id {
                metadata.issue.add_source(overlay.source, id);
            }
        }

        if let Some(title) = self.resolve("publisher.title", overlays, |o| o.publisher.title.clone())? {
            metadata.publisher.title = title;
        }
        if let Some(imprint) =
            self.resolve("publisher.imprint", overlays, |o| o.publisher.imprint.clone())?
        {
            metadata.publisher.imprint = Some(imprint);
        }

        if let Some(title) = self.resolve("series.title", overlays, |o| o.series.title.clone())? {
            metadata.series.title = title;
        }
        if let Some(volume) = self.resolve("series.volume", overlays, |o| o.series.volume)? {
            if let Err(err) = metadata.series.set_volume(volume) {
                tracing::warn!(%err, "ignoring merged value");
            }
        }
        if let Some(year) = self.resolve("series.start_year", overlays, |o| o.series.start_year)? {
            if let Err(err) = metadata.series.set_start_year(year) {
                tracing::warn!(%err, "ignoring merged value");
            }
        }

        if let Some(number) = self.resolve("issue.number", overlays, |o| o.issue.number.clone())? {
            metadata.issue.number = number;
        }
        if let Some(title) = self.resolve("issue.title", overlays, |o| o.issue.title.clone())? {
            metadata.issue.title = Some(title);
        }
        if let Some(format) = self.resolve("issue.format", overlays, |o| o.issue.format)? {
            metadata.issue.format = format;
        }
        if let Some(date) = self.resolve("issue.cover_date", overlays, |o| o.issue.cover_date)? {
            metadata.issue.cover_date = Some(date);
        }
        if let Some(date) = self.resolve("issue.store_date", overlays, |o| o.issue.store_date)? {
            metadata.issue.store_date = Some(date);
        }
        if let Some(count) = self.resolve("issue.page_count", overlays, |o| o.issue.page_count)? {
            metadata.issue.page_count = count;
        }
        if let Some(language) = self.resolve("issue.language", overlays, |o| o.issue.language.clone())? {
            metadata.issue.language = language;
        }
        if let Some(genres) = self.resolve("issue.genres", overlays, |o| o.issue.genres.clone())? {
            metadata.issue.genres = genres;
        }
        if let Some(characters) =
            self.resolve("issue.characters", overlays, |o| o.issue.characters.clone())?
        {
            metadata.issue.characters = characters;
        }
        if let Some(teams) = self.resolve("issue.teams", overlays, |o| o.issue.teams.clone())? {
            metadata.issue.teams = teams;
        }
        if let Some(locations) =
            self.resolve("issue.locations", overlays, |o| o.issue.locations.clone())?
        {
            metadata.issue.locations = locations;
        }
        if let Some(creators) = self.resolve("issue.creators", overlays, |o| o.issue.creators.clone())? {
            metadata.issue.set_creators(creators);
        }
        if let Some(arcs) = self.resolve("issue.story_arcs", overlays, |o| o.issue.story_arcs.clone())? {
            metadata.issue.story_arcs = arcs;
        }
        if let Some(summary) = self.resolve("issue.summary", overlays, |o| o.issue.summary.clone())? {
            metadata.issue.summary = Some(summary);
        }

        Ok(())
    }

    fn resolve<T: MergeValue>(
        &mut self,
        field: &str,
        overlays: &[Overlay],
        extract: impl Fn(&Overlay) -> Option<T>,
    ) -> Result<Option<T>> {
        let candidates: Vec<(Source, T)> = overlays
            .iter()
            .filter_map(|overlay| extract(overlay).map(|value| (overlay.source, value)))
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        // Ranked pass, lowest to highest priority: each later hit overwrites.
        let mut chosen = None;
        for source in &self.resolution_order {
            for (candidate, value) in &candidates {
                if candidate == source {
                    chosen = Some(value.clone());
                }
            }
        }
        if chosen.is_some() {
            return Ok(chosen);
        }

        // Only unranked services contributed. Agreement needs no operator.
        let first = &candidates[0].1;
        if candidates.iter().all(|(_, value)| value == first) {
            return Ok(Some(first.clone()));
        }
        self.disambiguate(field, &candidates)
    }

    fn disambiguate<T: MergeValue>(
        &mut self,
        field: &str,
        candidates: &[(Source, T)],
    ) -> Result<Option<T>> {
        let options: Vec<String> = candidates
            .iter()
            .map(|(source, value)| format!("{source}: {}", value.render()))
            .collect();
        for _ in 0..self.max_attempts {
            match self.input.choose(field, &options)? {
                Reply::Skip => return Ok(None),
                Reply::Pick(index) => match candidates.get(index) {
                    Some((_, value)) => return Ok(Some(value.clone())),
                    None => tracing::warn!(field, index, "selection out of range"),
                },
                Reply::Manual(raw) => match T::parse_input(raw.trim()) {
                    Some(value) => return Ok(Some(value)),
                    None => tracing::warn!(field, value = %raw, "could not parse replacement value"),
                },
            }
        }
        tracing::warn!(field, "too many invalid answers, leaving field untouched");
        Ok(None)
    }
}

impl MergeValue for String {
    fn render(&self) -> String {
        self.clone()
    }

    fn parse_input(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| raw.to_string())
    }
}

impl MergeValue for u32 {
    fn render(&self) -> String {
        self.to_string()
    }

    fn parse_input(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl MergeValue for i32 {
    fn render(&self) -> String {
        self.to_string()
    }

    fn parse_input(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl MergeValue for NaiveDate {
    fn render(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }

    fn parse_input(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

impl MergeValue for Format {
    fn render(&self) -> String {
        self.to_string()
    }

    fn parse_input(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| Format::parse(raw))
    }
}

impl MergeValue for BTreeSet<String> {
    fn render(&self) -> String {
        self.iter().cloned().collect::<Vec<_>>().join(", ")
    }

    fn parse_input(raw: &str) -> Option<Self> {
        let values: BTreeSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        (!values.is_empty()).then_some(values)
    }
}

impl MergeValue for BTreeSet<Genre> {
    fn render(&self) -> String {
        self.iter()
            .map(|genre| genre.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parse_input(raw: &str) -> Option<Self> {
        let values: BTreeSet<Genre> = raw
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Genre::parse)
            .collect();
        (!values.is_empty()).then_some(values)
    }
}

impl MergeValue for Vec<Creator> {
    fn render(&self) -> String {
        self.iter()
            .map(|creator| {
                let roles = creator
                    .roles
                    .iter()
                    .map(|role| role.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} ({roles})", creator.name)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Name (Role, Role); Name (Role)`
    fn parse_input(raw: &str) -> Option<Self> {
        let mut creators = Vec::new();
        for entry in raw.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, roles) = entry.split_once('(')?;
            let roles = roles.strip_suffix(')')?;
            let roles: BTreeSet<Role> = roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(Role::parse)
                .collect();
            let name = name.trim();
            if name.is_empty() || roles.is_empty() {
                return None;
            }
            creators.push(Creator {
                name: name.to_string(),
                roles,
            });
        }
        (!creators.is_empty()).then_some(creators)
    }
}

impl MergeValue for Vec<StoryArc> {
    fn render(&self) -> String {
        self.iter()
            .map(|arc| match arc.number {
                Some(number) => format!("{} #{number}", arc.title),
                None => arc.title.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Arc Title #2; Other Arc`
    fn parse_input(raw: &str) -> Option<Self> {
        let mut arcs = Vec::new();
        for entry in raw.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.rsplit_once('#') {
                Some((title, number)) if !title.trim().is_empty() => {
                    let number = number.trim().parse().ok()?;
                    arcs.push(StoryArc::new(title.trim(), Some(number)));
                }
                _ => arcs.push(StoryArc::new(entry, None)),
            }
        }
        (!arcs.is_empty()).then_some(arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, Publisher, Series};

    fn base_metadata() -> Metadata {
        Metadata::new(
            Publisher::new("DC Comics"),
            Series::new("Watchmen"),
            Issue::new("1"),
        )
    }

    fn overlay_with_summary(source: Source, summary: &str) -> Overlay {
        let mut overlay = Overlay::new(source);
        overlay.issue.summary = Some(summary.to_string());
        overlay
    }

    #[test]
    fn higher_priority_source_wins() {
        let overlays = vec![
            overlay_with_summary(Source::Metron, "from metron"),
            overlay_with_summary(Source::Comicvine, "from comicvine"),
        ];
        // Lowest to highest priority: Metron outranks Comicvine here.
        let mut input = ScriptedInput::new([]);
        let mut engine = Reconciler::new(vec![Source::Comicvine, Source::Metron], &mut input);
        let mut metadata = base_metadata();
        engine.apply(&mut metadata, &overlays).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("from metron"));
    }

    #[test]
    fn missing_overlay_entries_leave_fields_untouched() {
        let mut metadata = base_metadata();
        metadata.issue.summary = Some("original".to_string());
        let overlay = Overlay::new(Source::Metron);
        let mut input = ScriptedInput::new([]);
        let mut engine = Reconciler::new(vec![Source::Metron], &mut input);
        engine.apply(&mut metadata, &[overlay]).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("original"));
    }

    #[test]
    fn unranked_disagreement_asks_the_operator() {
        let overlays = vec![
            overlay_with_summary(Source::Metron, "first consulted"),
            overlay_with_summary(Source::Comicvine, "second consulted"),
        ];
        let mut input = ScriptedInput::new([Reply::Pick(1)]);
        let mut engine = Reconciler::new(vec![], &mut input);
        let mut metadata = base_metadata();
        engine.apply(&mut metadata, &overlays).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("second consulted"));
    }

    #[test]
    fn skip_leaves_the_field_untouched() {
        let overlays = vec![
            overlay_with_summary(Source::Metron, "a"),
            overlay_with_summary(Source::Comicvine, "b"),
        ];
        let mut input = ScriptedInput::new([Reply::Skip]);
        let mut engine = Reconciler::new(vec![], &mut input);
        let mut metadata = base_metadata();
        metadata.issue.summary = Some("original".to_string());
        engine.apply(&mut metadata, &overlays).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("original"));
    }

    #[test]
    fn unranked_agreement_needs_no_operator() {
        let overlays = vec![
            overlay_with_summary(Source::Metron, "same"),
            overlay_with_summary(Source::Comicvine, "same"),
        ];
        // An empty script would skip if the menu were shown.
        let mut input = ScriptedInput::new([]);
        let mut engine = Reconciler::new(vec![], &mut input);
        let mut metadata = base_metadata();
        engine.apply(&mut metadata, &overlays).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("same"));
    }

    #[test]
    fn manual_entry_replaces_the_value() {
        let overlays = vec![
            overlay_with_summary(Source::Metron, "a"),
            overlay_with_summary(Source::Comicvine, "b"),
        ];
        let mut input = ScriptedInput::new([Reply::Manual("typed by hand".to_string())]);
        let mut engine = Reconciler::new(vec![], &mut input);
        let mut metadata = base_metadata();
        engine.apply(&mut metadata, &overlays).unwrap();
        assert_eq!(metadata.issue.summary.as_deref(), Some("typed by hand"));
    }

    #[test]
    fn source_ids_accumulate() {
        let mut overlay = Overlay::new(Source::Metron);
        overlay.issue.id = Some(42);
        overlay.series.id = Some(7);
        let mut metadata = base_metadata();
        metadata.issue.add_source(Source::Comicvine, 9);

        let mut input = ScriptedInput::new([]);
        let mut engine = Reconciler::new(vec![Source::Metron], &mut input);
        engine.apply(&mut metadata, &[overlay]).unwrap();

        assert_eq!(metadata.issue.sources.get(&Source::Comicvine), Some(&9));
        assert_eq!(metadata.issue.sources.get(&Source::Metron), Some(&42));
        assert_eq!(metadata.series.sources.get(&Source::Metron), Some(&7));
    }

    #[test]
    fn invalid_merged_volume_is_ignored() {
        let mut overlay = Overlay::new(Source::Metron);
        overlay.series.volume = Some(0);
        let mut metadata = base_metadata();
        let mut input = ScriptedInput::new([]);
        let mut engine = Reconciler::new(vec![Source::Metron], &mut input);
        engine.apply(&mut metadata, &[overlay]).unwrap();
        assert_eq!(metadata.series.volume, 1);
    }
}
