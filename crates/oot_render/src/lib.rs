use oot_core::core_api::{
    CoreError, IntegrityMismatch, QuestProgress, Session, Settings, SlotSummary,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

const TITLE: &str = "THE LEGEND OF ZELDA: OCARINA OF TIME";
const LABEL_WIDTH: usize = 18;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub rupees: bool,
    pub deaths: bool,
    pub hearts: bool,
    pub health: bool,
    pub skulltulas: bool,
    pub defense: bool,
    pub quest: bool,
    pub settings: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.rupees
            || self.deaths
            || self.hearts
            || self.health
            || self.skulltulas
            || self.defense
            || self.quest
            || self.settings
    }

    /// True when at least one per-slot field is requested.
    pub fn has_slot_fields(&self) -> bool {
        self.name
            || self.rupees
            || self.deaths
            || self.hearts
            || self.health
            || self.skulltulas
            || self.defense
            || self.quest
    }
}

pub fn render_json_full(session: &Session) -> Result<JsonValue, CoreError> {
    let mut out = JsonMap::new();
    out.insert("settings".to_string(), settings_to_json(&session.settings()));
    out.insert(
        "slots".to_string(),
        JsonValue::Array(
            session
                .slot_summaries()?
                .iter()
                .map(slot_to_json)
                .collect(),
        ),
    );
    out.insert(
        "integrity".to_string(),
        mismatches_to_json(&session.integrity()?),
    );
    Ok(JsonValue::Object(out))
}

/// Renders only the requested fields. `slot` is 0-based; `None` covers all
/// three slots.
pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    slot: Option<usize>,
) -> Result<JsonValue, CoreError> {
    let mut out = JsonMap::new();

    if fields.settings {
        out.insert("settings".to_string(), settings_to_json(&session.settings()));
    }
    if fields.has_slot_fields() {
        let slots = selected_summaries(session, slot)?
            .iter()
            .map(|summary| JsonValue::Object(selected_slot_json(fields, summary)))
            .collect();
        out.insert("slots".to_string(), JsonValue::Array(slots));
    }

    Ok(JsonValue::Object(out))
}

/// `key=value` lines for the selected fields, settings first. Slot fields are
/// prefixed with `slotN.` unless a single slot was requested.
pub fn render_pairs(
    session: &Session,
    fields: &FieldSelection,
    slot: Option<usize>,
) -> Result<Vec<(String, String)>, CoreError> {
    let mut out = Vec::new();

    if fields.settings {
        let settings = session.settings();
        out.push(("sound".to_string(), settings.sound.to_string()));
        out.push(("targeting".to_string(), settings.targeting.to_string()));
    }

    if !fields.has_slot_fields() {
        return Ok(out);
    }

    for summary in selected_summaries(session, slot)? {
        let prefix = match slot {
            Some(_) => String::new(),
            None => format!("slot{}.", summary.slot),
        };
        let mut push = |key: &str, value: String| out.push((format!("{prefix}{key}"), value));

        if fields.name {
            push("name", summary.name.clone());
        }
        if fields.rupees {
            push("rupees", summary.rupees.to_string());
        }
        if fields.deaths {
            push("deaths", summary.deaths.to_string());
        }
        if fields.hearts {
            push("hearts", summary.heart_containers.to_string());
        }
        if fields.health {
            push("health", format_health(&summary));
        }
        if fields.skulltulas {
            push("skulltulas", summary.gold_skulltulas.to_string());
        }
        if fields.defense {
            push("double_defense", summary.double_defense.to_string());
        }
        if fields.quest {
            push("stones", format_collected(&summary.quest.spiritual_stones()));
            push("medallions", format_collected(&summary.quest.medallions()));
        }
    }

    Ok(out)
}

/// File-select style sheet covering settings, all three slots and any
/// integrity problems.
pub fn render_text(session: &Session) -> Result<String, CoreError> {
    let settings = session.settings();
    let mut lines = vec![
        String::new(),
        format!("{TITLE:^60}"),
        String::new(),
        format!(
            "  {:<LABEL_WIDTH$}{:<16}{:<LABEL_WIDTH$}{}",
            "Sound:",
            settings.sound.to_string(),
            "Z-Targeting:",
            settings.targeting
        ),
        String::new(),
    ];

    for summary in session.slot_summaries()? {
        write_slot_section(&mut lines, &summary);
        lines.push(String::new());
    }

    let mismatches = session.integrity()?;
    if !mismatches.is_empty() {
        lines.push(" ::: Integrity :::".to_string());
        for mismatch in &mismatches {
            lines.push(format!("  {mismatch}"));
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn write_slot_section(lines: &mut Vec<String>, summary: &SlotSummary) {
    lines.push(format!(" ::: File {} :::", summary.slot));
    if summary.is_blank {
        lines.push("  (empty)".to_string());
        return;
    }

    let name = if summary.name.is_empty() {
        "(no name)"
    } else {
        summary.name.as_str()
    };
    lines.push(format!("  {:<LABEL_WIDTH$}{name}", "Name:"));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{}",
        "Health:",
        format_health(summary)
    ));
    lines.push(format!("  {:<LABEL_WIDTH$}{}", "Rupees:", summary.rupees));
    lines.push(format!("  {:<LABEL_WIDTH$}{}", "Deaths:", summary.deaths));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{}",
        "Gold Skulltulas:", summary.gold_skulltulas
    ));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{}",
        "Double Defense:",
        if summary.double_defense { "yes" } else { "no" }
    ));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{}",
        "Stones:",
        format_collected(&summary.quest.spiritual_stones())
    ));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{}",
        "Medallions:",
        format_collected(&summary.quest.medallions())
    ));
    lines.push(format!(
        "  {:<LABEL_WIDTH$}{:04X} ({})",
        "Checksum:",
        summary.computed_checksum,
        if summary.checksum_valid() {
            "ok".to_string()
        } else {
            format!("stored {:04X}", summary.stored_checksum)
        }
    ));
}

fn selected_summaries(
    session: &Session,
    slot: Option<usize>,
) -> Result<Vec<SlotSummary>, CoreError> {
    match slot {
        Some(slot) => Ok(vec![session.slot_summary(slot)?]),
        None => session.slot_summaries(),
    }
}

fn selected_slot_json(fields: &FieldSelection, summary: &SlotSummary) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("slot".to_string(), JsonValue::from(summary.slot));

    if fields.name {
        out.insert("name".to_string(), JsonValue::String(summary.name.clone()));
    }
    if fields.rupees {
        out.insert("rupees".to_string(), JsonValue::from(summary.rupees));
    }
    if fields.deaths {
        out.insert("deaths".to_string(), JsonValue::from(summary.deaths));
    }
    if fields.hearts {
        out.insert(
            "heart_containers".to_string(),
            JsonValue::from(summary.heart_containers),
        );
    }
    if fields.health {
        out.insert("health".to_string(), JsonValue::from(summary.health));
    }
    if fields.skulltulas {
        out.insert(
            "gold_skulltulas".to_string(),
            JsonValue::from(summary.gold_skulltulas),
        );
    }
    if fields.defense {
        out.insert(
            "double_defense".to_string(),
            JsonValue::Bool(summary.double_defense),
        );
    }
    if fields.quest {
        out.insert("quest".to_string(), quest_to_json(&summary.quest));
    }

    out
}

fn slot_to_json(summary: &SlotSummary) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("slot".to_string(), JsonValue::from(summary.slot));
    m.insert("name".to_string(), JsonValue::String(summary.name.clone()));
    m.insert("is_blank".to_string(), JsonValue::Bool(summary.is_blank));
    m.insert("rupees".to_string(), JsonValue::from(summary.rupees));
    m.insert("deaths".to_string(), JsonValue::from(summary.deaths));
    m.insert(
        "heart_containers".to_string(),
        JsonValue::from(summary.heart_containers),
    );
    m.insert("health".to_string(), JsonValue::from(summary.health));
    m.insert(
        "gold_skulltulas".to_string(),
        JsonValue::from(summary.gold_skulltulas),
    );
    m.insert(
        "double_defense".to_string(),
        JsonValue::Bool(summary.double_defense),
    );
    m.insert("quest".to_string(), quest_to_json(&summary.quest));
    m.insert("slot_index".to_string(), JsonValue::from(summary.slot_index));
    m.insert(
        "checksum".to_string(),
        JsonValue::from(summary.stored_checksum),
    );
    m.insert(
        "checksum_valid".to_string(),
        JsonValue::Bool(summary.checksum_valid()),
    );
    JsonValue::Object(m)
}

fn quest_to_json(quest: &QuestProgress) -> JsonValue {
    let mut m = JsonMap::new();
    for (name, collected) in quest
        .spiritual_stones()
        .into_iter()
        .chain(quest.medallions())
    {
        m.insert(name.to_ascii_lowercase(), JsonValue::Bool(collected));
    }
    JsonValue::Object(m)
}

fn settings_to_json(settings: &Settings) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "sound".to_string(),
        JsonValue::String(settings.sound.to_string()),
    );
    m.insert(
        "targeting".to_string(),
        JsonValue::String(settings.targeting.to_string()),
    );
    JsonValue::Object(m)
}

fn mismatches_to_json(mismatches: &[IntegrityMismatch]) -> JsonValue {
    JsonValue::Array(
        mismatches
            .iter()
            .map(|mismatch| {
                let mut m = JsonMap::new();
                m.insert(
                    "chunk".to_string(),
                    JsonValue::String(mismatch.chunk.to_string()),
                );
                m.insert("computed".to_string(), JsonValue::from(mismatch.computed));
                m.insert("expected".to_string(), JsonValue::from(mismatch.expected));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

/// Current health as hearts, e.g. `9.50/10`.
fn format_health(summary: &SlotSummary) -> String {
    format!(
        "{:.2}/{}",
        f64::from(summary.health) / 16.0,
        summary.heart_containers
    )
}

fn format_collected(items: &[(&'static str, bool)]) -> String {
    let names: Vec<&str> = items
        .iter()
        .filter(|(_, collected)| *collected)
        .map(|(name, _)| *name)
        .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
