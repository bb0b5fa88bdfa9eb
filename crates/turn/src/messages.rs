//! Message rendering.
//!
//! Structured server messages become the classic text records the native
//! client shows: a classification header, the headline, the cleaned-up
//! body, and a trailing location line when the text does not already name
//! the coordinates. Ion storms, minefields, and a digest of the host
//! configuration are synthesized as additional messages.

use nubridge_codec::encipher_message;
use nubridge_snapshot::{IonStorm, Message, Minefield, Snapshot};
use serde_json::Value;

/// Wrap column for message bodies.
const WRAP_WIDTH: usize = 40;

/// Header letter and title per message classification 0..21.
const MESSAGE_CLASSES: [(char, &str); 22] = [
    ('r', "Outbound"),
    ('h', "System"),
    ('s', "Terraforming"),
    ('l', "Minelaying"),
    ('m', "Minesweeping"),
    ('p', "Colony"),
    ('f', "Combat"),
    ('f', "Fleet"),
    ('s', "Ship"),
    ('n', "Enemy Distress"),
    ('x', "Explosion"),
    ('d', "Starbase"),
    ('w', "Web Mines"),
    ('y', "Meteors"),
    ('z', "Sensor Sweep"),
    ('z', "Bio Scan"),
    ('e', "Distress Call"),
    ('r', "Player"),
    ('h', "Diplomacy"),
    ('m', "Mine Scan"),
    ('9', "Dark Sense"),
    ('9', "Hiss"),
];

/// Classifications whose target is another player rather than an entity.
const PLAYER_TO_PLAYER: [i32; 2] = [0, 17];

/// Render every message for one turn, newest first, with the synthesized
/// block appended, already enciphered for the message file.
pub fn render_turn_messages(snapshot: &Snapshot) -> Vec<Vec<u8>> {
    let mut sorted: Vec<&Message> = snapshot.messages.iter().collect();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));

    let mut texts: Vec<String> = sorted.into_iter().map(render_message).collect();
    for storm in &snapshot.ionstorms {
        texts.push(ion_storm_message(storm));
    }
    for field in &snapshot.minefields {
        texts.push(minefield_message(field, snapshot));
    }
    texts.extend(config_digest_messages(snapshot));

    texts.iter().map(|t| encipher_message(t)).collect()
}

/// Render one structured message to its text record.
pub fn render_message(message: &Message) -> String {
    let mut text = header(message);
    text.push('\n');
    if !message.headline.is_empty() {
        text.push_str(&format!("From: {}\n", message.headline));
    }
    text.push('\n');
    text.push_str(&word_wrap(&strip_html(&message.body), WRAP_WIDTH));

    if message.x != 0 || message.y != 0 {
        let normalized = normalize_coordinates(&text);
        let spaced = format!("({}, {})", message.x, message.y);
        let tight = format!("({},{})", message.x, message.y);
        if !normalized.contains(&spaced) && !normalized.contains(&tight) {
            text.push_str(&format!("\n\nLocation: ({}, {})", message.x, message.y));
        }
    }
    text
}

fn header(message: &Message) -> String {
    let class = usize::try_from(message.message_type)
        .ok()
        .filter(|&t| t < MESSAGE_CLASSES.len());
    let (letter, title) = class.map_or(('h', "System"), |t| MESSAGE_CLASSES[t]);

    let id_part = if PLAYER_TO_PLAYER.contains(&message.message_type) {
        // One hex digit of the target player, then three zeros.
        format!("{:X}000", message.target & 0xF)
    } else {
        format!("{:04}", message.target.clamp(0, 9999))
    };
    format!("(-{letter}{id_part})<<< {title} >>>")
}

/// Strip the HTML the server embeds: `<br>` becomes a line break,
/// `<sub>...</sub>` disappears, other tags are dropped, whitespace runs
/// collapse.
pub fn strip_html(body: &str) -> String {
    // Source newlines are formatting noise; only <br> makes a line break.
    let mut text = body.replace(['\r', '\n'], " ");

    while let Some(start) = text.find("<sub>") {
        match text[start..].find("</sub>") {
            Some(end) => text.replace_range(start..start + end + "</sub>".len(), ""),
            None => {
                text.truncate(start);
                break;
            }
        }
    }

    for tag in ["<br/>", "<br />", "<br>"] {
        text = text.replace(tag, "\n");
    }

    // Drop any remaining tags.
    let mut cleaned = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => cleaned.push(c),
            _ => {}
        }
    }

    // Collapse space runs, but keep the line breaks we just created.
    let mut collapsed = String::with_capacity(cleaned.len());
    for line in cleaned.split('\n') {
        if !collapsed.is_empty() {
            collapsed.push('\n');
        }
        collapsed.push_str(&line.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    collapsed
}

/// Greedy word wrap, preserving existing line breaks.
pub fn word_wrap(text: &str, width: usize) -> String {
    let mut wrapped = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            wrapped.push('\n');
        }
        let mut column = 0;
        for word in line.split_whitespace() {
            if column > 0 && column + 1 + word.len() > width {
                wrapped.push('\n');
                column = 0;
            } else if column > 0 {
                wrapped.push(' ');
                column += 1;
            }
            wrapped.push_str(word);
            column += word.len();
        }
    }
    wrapped
}

fn normalize_coordinates(text: &str) -> String {
    text.replace("( ", "(").replace(" )", ")").replace(" ,", ",")
}

/// Voltage classification for storm advisories.
fn voltage_class(voltage: i32) -> &'static str {
    match voltage {
        i32::MIN..=50 => "harmless",
        51..=100 => "moderate",
        101..=150 => "strong",
        151..=200 => "dangerous",
        _ => "very dangerous",
    }
}

/// Synthesize the advisory for one active ion storm.
pub fn ion_storm_message(storm: &IonStorm) -> String {
    let trend = if storm.is_growing {
        "growing"
    } else {
        "weakening"
    };
    format!(
        "(-i{:04})<<< ION Advisory >>>\n\n\
         Ion disturbance {}\n\
         Centered at: ({}, {})\n\
         Voltage: {} ({}, {})\n\
         Heading: {} at warp {}\n\
         Radius: {} ly",
        storm.id.clamp(0, 9999),
        storm.id,
        storm.x,
        storm.y,
        storm.voltage,
        voltage_class(storm.voltage),
        trend,
        storm.heading,
        storm.warp,
        storm.radius,
    )
}

/// Synthesize the advisory for one visible minefield.
pub fn minefield_message(field: &Minefield, snapshot: &Snapshot) -> String {
    let players = snapshot.player_map();
    let race = players.race_of(field.owner_id);
    let owner = snapshot
        .race(i32::from(race))
        .map(|r| r.name.clone())
        .unwrap_or_else(|| format!("player {}", field.owner_id));
    let kind = if field.is_web { "Web mines" } else { "Mines" };
    format!(
        "(-m{:04})<<< Mine Scan >>>\n\n\
         Minefield {}\n\
         Laid by: {}\n\
         At: ({}, {})\n\
         Radius: {} ly\n\
         {}: {} units",
        field.id.clamp(0, 9999),
        field.id,
        owner,
        field.x,
        field.y,
        field.radius,
        kind,
        field.units,
    )
}

/// Synthesize the three configuration digests: named settings, host-config
/// scalars, host-config arrays.
pub fn config_digest_messages(snapshot: &Snapshot) -> Vec<String> {
    let settings = &snapshot.settings;

    let mut named = format!(
        "(-g0000)<<< Game Settings >>>\n\nGame: {}\nHost start: {}",
        settings.name, settings.host_start
    );
    if snapshot.game.turn > 0 {
        named.push_str(&format!("\nTurn: {}", snapshot.game.turn));
    }

    let mut scalars = String::from("(-g0000)<<< Host Configuration >>>\n");
    let mut arrays = String::from("(-g0000)<<< Host Configuration (Tables) >>>\n");
    for (key, value) in &settings.extra {
        match value {
            Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(render_scalar).collect();
                arrays.push_str(&format!("\n{key} = {}", rendered.join(",")));
            }
            Value::Object(_) => {}
            scalar => {
                scalars.push_str(&format!("\n{key} = {}", render_scalar(scalar)));
            }
        }
    }

    vec![
        named,
        word_wrap(&scalars, WRAP_WIDTH),
        word_wrap(&arrays, WRAP_WIDTH),
    ]
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn header_carries_class_letter_and_target() {
        let text = render_message(&message(json!({
            "id": 5, "messagetype": 11, "target": 363, "body": "Starbase built."
        })));
        assert!(text.starts_with("(-d0363)<<< Starbase >>>\n"));
    }

    #[test]
    fn player_messages_encode_the_target_as_hex() {
        let text = render_message(&message(json!({
            "id": 5, "messagetype": 17, "target": 11, "body": "Greetings."
        })));
        assert!(text.starts_with("(-rB000)<<< Player >>>\n"));
    }

    #[test]
    fn location_is_appended_unless_named() {
        let with_location = render_message(&message(json!({
            "id": 1, "messagetype": 8, "target": 3, "x": 2100, "y": 2300,
            "body": "Engine damage."
        })));
        assert!(with_location.ends_with("Location: (2100, 2300)"));

        // Spaced coordinates in the body still count as named.
        let already_named = render_message(&message(json!({
            "id": 1, "messagetype": 8, "target": 3, "x": 2100, "y": 2300,
            "body": "We are at ( 2100, 2300 ) and holding."
        })));
        assert!(!already_named.contains("Location:"));
    }

    #[test]
    fn html_is_stripped_and_wrapped() {
        let text = strip_html("Fuel    low.<br>Deploying <sub>internal</sub>reserves <b>now</b>.");
        assert_eq!(text, "Fuel low.\nDeploying reserves now.");

        let wrapped = word_wrap(
            "one two three four five six seven eight nine ten eleven twelve",
            20,
        );
        assert!(wrapped.lines().all(|l| l.len() <= 20));
        assert_eq!(wrapped.split_whitespace().count(), 12);
    }

    #[test]
    fn storm_advisories_classify_voltage() {
        let storm: IonStorm = serde_json::from_value(json!({
            "id": 4, "x": 1500, "y": 1700, "voltage": 180, "radius": 60,
            "heading": 90, "warp": 6, "isgrowing": true
        }))
        .unwrap();
        let text = ion_storm_message(&storm);
        assert!(text.starts_with("(-i0004)<<< ION Advisory >>>"));
        assert!(text.contains("dangerous, growing"));

        let weak: IonStorm = serde_json::from_value(json!({"id": 1, "voltage": 30})).unwrap();
        assert!(ion_storm_message(&weak).contains("harmless, weakening"));
    }

    #[test]
    fn turn_messages_are_newest_first_with_synthesized_tail() {
        let snapshot = Snapshot::from_value(json!({
            "player": {"id": 1, "raceid": 3},
            "settings": {"hoststart": "1/1/2026 1:00:00 AM", "name": "Test"},
            "game": {"turn": 3},
            "messages": [
                {"id": 1, "messagetype": 1, "body": "older"},
                {"id": 2, "messagetype": 1, "body": "newer"}
            ],
            "ionstorms": [{"id": 9, "voltage": 10}]
        }))
        .unwrap();
        let records = render_turn_messages(&snapshot);
        // 2 game messages + 1 storm + 3 config digests.
        assert_eq!(records.len(), 6);
        let first = nubridge_codec::decipher_message(&records[0]);
        let second = nubridge_codec::decipher_message(&records[1]);
        assert!(first.contains("newer"));
        assert!(second.contains("older"));
        let storm = nubridge_codec::decipher_message(&records[2]);
        assert!(storm.contains("ION Advisory"));
    }
}
