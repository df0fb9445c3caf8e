//! Studio skin
//!
//! Compact layout: status and characters as chips, field notes as cards,
//! notices as one-line toasts, and the map as a grid of stages.

use std::io::{self, Write};

use crate::presentation::view_models::{
    DioramaView, FieldNotesView, MomentsView, PlacementPanelView, ReportView, StatusView,
};
use crate::presentation::{Notice, ViewUpdate};

use super::Skin;

const CARD_RULE: &str = "────────────────────────────────────────";

pub struct StudioSkin<W: Write> {
    out: W,
}

impl<W: Write> StudioSkin<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn chip(text: &str) -> String {
        format!("( {text} )")
    }

    fn placements(&mut self, panel: &PlacementPanelView) -> io::Result<()> {
        let chips: Vec<String> = panel
            .rows
            .iter()
            .map(|row| {
                let at = row
                    .options
                    .get(row.selected)
                    .and_then(|option| option.location_id.as_ref().map(|_| option.label.as_str()));
                match at {
                    Some(location) => Self::chip(&format!("{} @ {}", row.label, location)),
                    None => Self::chip(&row.label),
                }
            })
            .collect();
        writeln!(self.out, "cast  {}", chips.join(" "))
    }

    fn status(&mut self, status: &StatusView) -> io::Result<()> {
        match status {
            StatusView::NotInitialized(message) => writeln!(self.out, "status  {message}"),
            StatusView::Snapshot {
                status,
                interactions_count,
                current_time,
                characters,
            } => {
                let mut chips = vec![
                    Self::chip(status),
                    Self::chip(&format!("{interactions_count} interactions")),
                ];
                if let Some(time) = current_time {
                    chips.push(Self::chip(time));
                }
                writeln!(self.out, "status  {}", chips.join(" "))?;
                for line in characters {
                    match line.intensity {
                        Some(intensity) => writeln!(
                            self.out,
                            "        {} {}",
                            Self::chip(&line.text()),
                            Self::chip(&format!("{:.0}%", intensity * 100.0))
                        )?,
                        None => writeln!(self.out, "        {}", Self::chip(&line.text()))?,
                    }
                }
                Ok(())
            }
        }
    }

    fn field_notes(&mut self, notes: &FieldNotesView) -> io::Result<()> {
        match notes {
            FieldNotesView::Placeholder(message) => writeln!(self.out, "notes  {message}"),
            FieldNotesView::Notes(notes) => {
                for note in notes {
                    writeln!(self.out, "{CARD_RULE}")?;
                    let flag = if note.emergent {
                        format!(" {}", Self::chip("EMERGENT"))
                    } else {
                        String::new()
                    };
                    writeln!(
                        self.out,
                        "{} · {} · {}{flag}",
                        note.time, note.location_name, note.time_of_day
                    )?;
                    writeln!(self.out, "  {}", note.action)?;
                    if !note.material.is_empty() {
                        writeln!(self.out, "  {}", note.material)?;
                    }
                    let temperature = if note.temperature.is_empty() {
                        Self::chip(&note.temperature_class)
                    } else {
                        note.temperature.clone()
                    };
                    writeln!(self.out, "  Emotional temperature: {temperature}")?;
                }
                writeln!(self.out, "{CARD_RULE}")
            }
        }
    }

    fn report(&mut self, report: &ReportView) -> io::Result<()> {
        match report {
            ReportView::Placeholder(message) => writeln!(self.out, "report  {message}"),
            ReportView::Report(text) => {
                writeln!(self.out, "report")?;
                for line in text.lines() {
                    writeln!(self.out, "  {line}")?;
                }
                Ok(())
            }
            ReportView::Quality(quality) => {
                writeln!(self.out, "quality")?;
                for suggestion in &quality.suggestions {
                    let severity = if suggestion.high { "high" } else { "note" };
                    writeln!(
                        self.out,
                        "  {} {}: {}",
                        Self::chip(severity),
                        suggestion.title,
                        suggestion.message
                    )?;
                    if let Some(action) = &suggestion.action {
                        writeln!(self.out, "    {action}")?;
                    }
                }
                if let Some(all_clear) = &quality.all_clear {
                    writeln!(self.out, "  {all_clear}")?;
                }
                if !quality.overused_words.is_empty() {
                    let words: Vec<String> = quality
                        .overused_words
                        .iter()
                        .map(|word| Self::chip(&format!("{} ×{}", word.word, word.count)))
                        .collect();
                    writeln!(self.out, "  {}", words.join(" "))?;
                }
                Ok(())
            }
        }
    }

    fn moments(&mut self, moments: &MomentsView) -> io::Result<()> {
        match moments {
            MomentsView::Placeholder(message) => writeln!(self.out, "moments  {message}"),
            MomentsView::Moments(moments) => {
                for moment in moments {
                    writeln!(self.out, "{CARD_RULE}")?;
                    writeln!(self.out, "{}", moment.header())?;
                    for (label, text) in [
                        ("Composition", &moment.composition),
                        ("Color", &moment.color),
                        ("Key gesture", &moment.gesture),
                        ("For you (painter)", &moment.painting_prompt),
                    ] {
                        writeln!(self.out, "  {label}: {text}")?;
                    }
                    writeln!(
                        self.out,
                        "  For image generation: {}",
                        Self::chip(&moment.image_prompt)
                    )?;
                    writeln!(self.out, "  Why paintable: {}", moment.why_paintable)?;
                }
                writeln!(self.out, "{CARD_RULE}")
            }
        }
    }

    fn map_grid(&mut self, diorama: &DioramaView) -> io::Result<()> {
        let follow = if diorama.auto_scroll { "follow on" } else { "follow off" };
        writeln!(
            self.out,
            "map  {} {}",
            Self::chip(&diorama.clock),
            Self::chip(follow)
        )?;
        for stage in &diorama.stages {
            let cursor = if stage.active { '▶' } else { ' ' };
            let figures: Vec<&str> = stage
                .figures
                .iter()
                .map(|figure| figure.label.as_str())
                .collect();
            writeln!(
                self.out,
                "{cursor} {} {:<20} {:<24} {}",
                stage.neon,
                stage.name,
                stage.meta,
                figures.join(" ")
            )?;
        }
        Ok(())
    }

    fn toast(&mut self, notice: &Notice) -> io::Result<()> {
        let icon = if notice.is_error() { '✗' } else { '✓' };
        writeln!(self.out, "{icon} {}", notice.text)
    }
}

impl<W: Write> Skin for StudioSkin<W> {
    fn apply(&mut self, update: &ViewUpdate) -> io::Result<()> {
        match update {
            ViewUpdate::Placements(panel) => self.placements(panel)?,
            ViewUpdate::Status(status) => self.status(status)?,
            ViewUpdate::FieldNotes(notes) => self.field_notes(notes)?,
            ViewUpdate::Report(report) => self.report(report)?,
            ViewUpdate::Moments(moments) => self.moments(moments)?,
            ViewUpdate::Diorama(diorama) => self.map_grid(diorama)?,
            ViewUpdate::Overlay(Some(detail)) => writeln!(
                self.out,
                "{} {} {} {}",
                Self::chip(&detail.name),
                Self::chip(&detail.emotional_state),
                Self::chip(&detail.animal),
                Self::chip(&detail.location)
            )?,
            ViewUpdate::Overlay(None) => {}
            ViewUpdate::RunTrigger(trigger) => {
                if !trigger.enabled {
                    writeln!(self.out, "… {}", trigger.label)?;
                }
            }
            ViewUpdate::Notice(notice) => self.toast(notice)?,
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        interaction, location, moment, populated_location,
    };
    use crate::presentation::view_models::{diorama_view, field_notes_view, moments_view};

    fn render(update: ViewUpdate) -> String {
        let mut skin = StudioSkin::new(Vec::new());
        skin.apply(&update).unwrap();
        String::from_utf8(skin.into_inner()).unwrap()
    }

    #[test]
    fn map_grid_marks_active_stage() {
        let locations = vec![
            location("loc_bonfire", "Bonfire"),
            populated_location("loc_canyon", "Canyon", &[("c1", "Mara Okonkwo")]),
        ];
        let view = diorama_view(&locations, 1, true, "06:05 PM".to_string());

        let output = render(ViewUpdate::Diorama(view));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "map  ( 06:05 PM ) ( follow on )");
        assert!(lines[1].starts_with("  ◈ Bonfire"));
        assert!(lines[2].starts_with("▶ ◢ Canyon"));
        assert!(lines[2].ends_with("Mara"));
    }

    #[test]
    fn notices_render_as_toasts() {
        assert_eq!(render(ViewUpdate::Notice(Notice::info("Session saved"))), "✓ Session saved\n");
        assert_eq!(render(ViewUpdate::Notice(Notice::error("Error saving"))), "✗ Error saving\n");
    }

    #[test]
    fn status_shows_chips() {
        let output = render(ViewUpdate::Status(StatusView::Snapshot {
            status: "paused".to_string(),
            interactions_count: 4,
            current_time: None,
            characters: Vec::new(),
        }));

        assert_eq!(output, "status  ( paused ) ( 4 interactions )\n");
    }

    #[test]
    fn field_notes_mark_emergence_and_capitalize_temperature() {
        let notes = field_notes_view(&[
            interaction("Bonfire", "tense", true),
            interaction("Canyon", "", false),
        ]);

        let output = render(ViewUpdate::FieldNotes(notes));

        assert!(output.contains("06:05 PM · Bonfire · dusk ( EMERGENT )"));
        assert!(output.contains("06:05 PM · Canyon · dusk\n"));
        assert!(output.contains("Emotional temperature: Tense"));
        assert!(output.contains("Emotional temperature: ( uncertain )"));
        assert_eq!(output.matches("EMERGENT").count(), 1);
    }

    #[test]
    fn moments_show_every_section() {
        let output = render(ViewUpdate::Moments(moments_view(&[moment("Bonfire")])));

        assert!(output.contains("Moment 1 [06:05 PM] - Bonfire"));
        for expected in [
            "Composition: Low horizon",
            "Color: Ochre",
            "Key gesture: Open palm",
            "For you (painter): Paint the pause",
            "For image generation: ( oil sketch, dusk )",
            "Why paintable: Stillness",
        ] {
            assert!(output.contains(expected), "missing {expected:?} in {output}");
        }
    }
}
