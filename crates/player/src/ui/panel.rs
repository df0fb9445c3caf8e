//! Panel skin
//!
//! The basic layout: one titled section per container, bracketed field-note
//! headers, and alert-style notices.

use std::io::{self, Write};

use crate::presentation::view_models::{
    CharacterDetailView, DioramaView, FieldNotesView, MomentsView, PlacementPanelView,
    QualityView, ReportView, RunTriggerView, StatusView,
};
use crate::presentation::{Notice, ViewUpdate};

use super::Skin;

pub struct PanelSkin<W: Write> {
    out: W,
}

impl<W: Write> PanelSkin<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== {title} ===")
    }

    fn placements(&mut self, panel: &PlacementPanelView) -> io::Result<()> {
        self.section("Character Placement")?;
        for row in &panel.rows {
            let selected = row
                .options
                .get(row.selected)
                .map(|option| option.label.as_str())
                .unwrap_or_default();
            writeln!(self.out, "{}: {}", row.label, selected)?;
        }
        Ok(())
    }

    fn status(&mut self, status: &StatusView) -> io::Result<()> {
        self.section("Simulation Status")?;
        match status {
            StatusView::NotInitialized(message) => writeln!(self.out, "{message}"),
            StatusView::Snapshot {
                status,
                interactions_count,
                current_time,
                characters,
            } => {
                writeln!(self.out, "Status: {status}")?;
                writeln!(self.out, "Interactions: {interactions_count}")?;
                if let Some(time) = current_time {
                    writeln!(self.out, "Time: {time}")?;
                }
                for line in characters {
                    writeln!(self.out, "  {}", line.text())?;
                }
                Ok(())
            }
        }
    }

    fn field_notes(&mut self, notes: &FieldNotesView) -> io::Result<()> {
        self.section("Field Notes")?;
        match notes {
            FieldNotesView::Placeholder(message) => writeln!(self.out, "{message}"),
            FieldNotesView::Notes(notes) => {
                for note in notes {
                    if note.emergent {
                        writeln!(self.out, "{} EMERGENT", note.header())?;
                    } else {
                        writeln!(self.out, "{}", note.header())?;
                    }
                    writeln!(self.out, "{}", note.action)?;
                    if !note.material.is_empty() {
                        writeln!(self.out, "{}", note.material)?;
                    }
                    writeln!(self.out, "Emotional temperature: {}", note.temperature)?;
                    writeln!(self.out)?;
                }
                Ok(())
            }
        }
    }

    fn report(&mut self, report: &ReportView) -> io::Result<()> {
        self.section("Emergence Report")?;
        match report {
            ReportView::Placeholder(message) | ReportView::Report(message) => {
                writeln!(self.out, "{message}")
            }
            ReportView::Quality(quality) => self.quality(quality),
        }
    }

    fn quality(&mut self, quality: &QualityView) -> io::Result<()> {
        writeln!(self.out, "Quality Analysis")?;
        for suggestion in &quality.suggestions {
            let marker = if suggestion.high { "!!" } else { "-" };
            writeln!(self.out, "{marker} {}", suggestion.title)?;
            writeln!(self.out, "   {}", suggestion.message)?;
            writeln!(self.out, "   {}", suggestion.detail)?;
            if let Some(action) = &suggestion.action {
                writeln!(self.out, "   -> {action}")?;
            }
        }
        if let Some(all_clear) = &quality.all_clear {
            writeln!(self.out, "{all_clear}")?;
        }
        if !quality.overused_words.is_empty() {
            writeln!(self.out, "Overused words:")?;
            for word in &quality.overused_words {
                writeln!(self.out, "  {}", word.text())?;
            }
        }
        Ok(())
    }

    fn moments(&mut self, moments: &MomentsView) -> io::Result<()> {
        self.section("Paintable Moments")?;
        match moments {
            MomentsView::Placeholder(message) => writeln!(self.out, "{message}"),
            MomentsView::Moments(moments) => {
                for moment in moments {
                    writeln!(self.out, "{}", moment.header())?;
                    writeln!(self.out, "  Composition: {}", moment.composition)?;
                    writeln!(self.out, "  Color: {}", moment.color)?;
                    writeln!(self.out, "  Key gesture: {}", moment.gesture)?;
                    writeln!(self.out, "  For you (painter): {}", moment.painting_prompt)?;
                    writeln!(self.out, "  For image generation: {}", moment.image_prompt)?;
                    writeln!(self.out, "  Why paintable: {}", moment.why_paintable)?;
                    writeln!(self.out)?;
                }
                Ok(())
            }
        }
    }

    fn diorama(&mut self, diorama: &DioramaView) -> io::Result<()> {
        self.section(&format!("Map {}", diorama.clock))?;
        for stage in &diorama.stages {
            let names: Vec<&str> = stage
                .figures
                .iter()
                .map(|figure| figure.full_name.as_str())
                .collect();
            writeln!(self.out, "{} ({}): {}", stage.name, stage.meta, names.join(", "))?;
        }
        Ok(())
    }

    fn overlay(&mut self, detail: Option<&CharacterDetailView>) -> io::Result<()> {
        if let Some(detail) = detail {
            self.section(&detail.name)?;
            writeln!(self.out, "Emotional state: {}", detail.emotional_state)?;
            writeln!(self.out, "Animal: {}", detail.animal)?;
            writeln!(self.out, "Location: {}", detail.location)?;
        }
        Ok(())
    }

    fn run_trigger(&mut self, trigger: &RunTriggerView) -> io::Result<()> {
        if !trigger.enabled {
            writeln!(self.out, "{}", trigger.label)?;
        }
        Ok(())
    }

    fn notice(&mut self, notice: &Notice) -> io::Result<()> {
        if notice.is_error() {
            writeln!(self.out, "\n[ALERT] {}", notice.text)
        } else {
            writeln!(self.out, "\n[OK] {}", notice.text)
        }
    }
}

impl<W: Write> Skin for PanelSkin<W> {
    fn apply(&mut self, update: &ViewUpdate) -> io::Result<()> {
        match update {
            ViewUpdate::Placements(panel) => self.placements(panel)?,
            ViewUpdate::Status(status) => self.status(status)?,
            ViewUpdate::FieldNotes(notes) => self.field_notes(notes)?,
            ViewUpdate::Report(report) => self.report(report)?,
            ViewUpdate::Moments(moments) => self.moments(moments)?,
            ViewUpdate::Diorama(diorama) => self.diorama(diorama)?,
            ViewUpdate::Overlay(detail) => self.overlay(detail.as_ref())?,
            ViewUpdate::RunTrigger(trigger) => self.run_trigger(trigger)?,
            ViewUpdate::Notice(notice) => self.notice(notice)?,
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::interaction;
    use crate::presentation::view_models::{field_notes_view, run_trigger, NOT_INITIALIZED};

    fn render(updates: &[ViewUpdate]) -> String {
        let mut skin = PanelSkin::new(Vec::new());
        for update in updates {
            skin.apply(update).unwrap();
        }
        String::from_utf8(skin.into_inner()).unwrap()
    }

    #[test]
    fn field_notes_use_bracketed_headers() {
        let notes = field_notes_view(&[interaction("Bonfire", "tense", true)]);

        let output = render(&[ViewUpdate::FieldNotes(notes)]);

        assert!(output.contains("[06:05 PM - Bonfire - dusk] EMERGENT"));
        assert!(output.contains("Mara sets down the lantern"));
        assert!(output.contains("Emotional temperature: Tense"));
    }

    #[test]
    fn errors_render_as_alerts() {
        let output = render(&[
            ViewUpdate::Status(StatusView::NotInitialized(NOT_INITIALIZED.to_string())),
            ViewUpdate::Notice(Notice::error("Error running simulation. Check the log for details.")),
        ]);

        assert!(output.contains(NOT_INITIALIZED));
        assert!(output.contains("[ALERT] Error running simulation."));
    }

    #[test]
    fn enabled_trigger_prints_nothing() {
        assert_eq!(render(&[ViewUpdate::RunTrigger(run_trigger(true))]), "");
        assert_eq!(
            render(&[ViewUpdate::RunTrigger(run_trigger(false))]),
            "Running...\n"
        );
    }
}
