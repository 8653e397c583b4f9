//! Landable planets.
//!
//! A `planet <name>` node describes what the player sees after landing. The
//! stellar object that depicts the planet refers to it by true name.

use crate::{DataNode, DataWriter, EntityName, TributeFleet};
use serde::{Deserialize, Serialize};

/// One paragraph of description text, plus any nodes attached under it
/// (conditions, for example).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub children: Vec<DataNode>,
}

impl Paragraph {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            text: text.into(),
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    name: EntityName,
    attributes: Vec<String>,
    landscape: String,
    music: String,
    description: Vec<Paragraph>,
    spaceport: Vec<Paragraph>,
    shipyards: Vec<String>,
    outfitters: Vec<String>,
    government: String,
    required_reputation: Option<f64>,
    bribe: Option<f64>,
    security: Option<f64>,
    tribute: Option<f64>,
    tribute_threshold: Option<f64>,
    tribute_fleets: Vec<TributeFleet>,
    tribute_unparsed: Vec<DataNode>,
    unparsed: Vec<DataNode>,
}

impl Planet {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Planet {
            name: EntityName::new(name),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn from_node(node: &DataNode) -> Self {
        let mut planet = Planet::default();
        planet.load(node);
        planet
    }

    /// Reads a `planet <name>` node on top of the current values. Nodes
    /// with no name are ignored.
    pub(crate) fn load(&mut self, node: &DataNode) {
        if node.size() < 2 {
            return;
        }
        self.name = EntityName::new(node.token(1));

        for child in node {
            let has_value = child.size() >= 2;
            match child.keyword() {
                "display name" if has_value => self.name.set_display_name(child.token(1)),
                "attributes" => self
                    .attributes
                    .extend(child.tokens()[1..].iter().cloned()),
                "landscape" if has_value => self.landscape = child.token(1).to_string(),
                "music" if has_value => self.music = child.token(1).to_string(),
                "description" if has_value => self.description.push(paragraph(child)),
                "spaceport" if has_value => self.spaceport.push(paragraph(child)),
                "shipyard" if has_value => self.shipyards.push(child.token(1).to_string()),
                "outfitter" if has_value => self.outfitters.push(child.token(1).to_string()),
                "government" if has_value => self.government = child.token(1).to_string(),
                "required reputation" if has_value => {
                    self.required_reputation = Some(child.value(1));
                }
                "bribe" if has_value => self.bribe = Some(child.value(1)),
                "security" if has_value => self.security = Some(child.value(1)),
                "tribute" if has_value => self.load_tribute(child),
                _ => self.unparsed.push(child.clone()),
            }
        }
    }

    fn load_tribute(&mut self, node: &DataNode) {
        self.tribute = Some(node.value(1));
        for child in node {
            match child.keyword() {
                "threshold" if child.size() >= 2 => self.tribute_threshold = Some(child.value(1)),
                "fleet" if child.size() >= 2 => {
                    let count = if child.size() >= 3 {
                        child.value(2) as i32
                    } else {
                        1
                    };
                    self.tribute_fleets
                        .push(TributeFleet::new(child.token(1), count));
                }
                _ => self.tribute_unparsed.push(child.clone()),
            }
        }
    }

    pub fn save(&self, file: &mut DataWriter) {
        file.write(&[&"planet", &self.true_name()]);
        file.begin_child();

        if self.has_display_name() {
            file.write(&[&"display name", &self.display_name()]);
        }
        if !self.attributes.is_empty() {
            file.write_token("attributes");
            for attribute in &self.attributes {
                file.write_token(attribute);
            }
            file.end_line();
        }
        if !self.landscape.is_empty() {
            file.write(&[&"landscape", &self.landscape]);
        }
        if !self.music.is_empty() {
            file.write(&[&"music", &self.music]);
        }
        save_paragraphs(file, "description", &self.description);
        save_paragraphs(file, "spaceport", &self.spaceport);
        for shipyard in &self.shipyards {
            file.write(&[&"shipyard", shipyard]);
        }
        for outfitter in &self.outfitters {
            file.write(&[&"outfitter", outfitter]);
        }
        if !self.government.is_empty() {
            file.write(&[&"government", &self.government]);
        }
        if let Some(value) = self.required_reputation {
            file.write(&[&"required reputation", &value]);
        }
        if let Some(value) = self.bribe {
            file.write(&[&"bribe", &value]);
        }
        if let Some(value) = self.security {
            file.write(&[&"security", &value]);
        }
        if let Some(tribute) = self.tribute {
            file.write(&[&"tribute", &tribute]);
            file.begin_child();
            if let Some(threshold) = self.tribute_threshold {
                file.write(&[&"threshold", &threshold]);
            }
            for fleet in self.tribute_fleets.iter().filter(|it| !it.name.is_empty()) {
                if fleet.count == 1 {
                    file.write(&[&"fleet", &fleet.name]);
                } else {
                    file.write(&[&"fleet", &fleet.name, &fleet.count]);
                }
            }
            for node in &self.tribute_unparsed {
                file.write_node(node);
            }
            file.end_child();
        }
        for node in &self.unparsed {
            file.write_node(node);
        }

        file.end_child();
    }

    #[must_use]
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    #[must_use]
    pub fn true_name(&self) -> &str {
        self.name.true_name()
    }

    #[must_use]
    pub fn has_display_name(&self) -> bool {
        self.name.has_display_name()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.display_name()
    }

    #[must_use]
    pub fn attributes(&self) -> &Vec<String> {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<String> {
        &mut self.attributes
    }

    #[must_use]
    pub fn landscape(&self) -> &str {
        &self.landscape
    }

    #[must_use]
    pub fn music(&self) -> &str {
        &self.music
    }

    #[must_use]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.description
    }

    #[must_use]
    pub fn spaceport_paragraphs(&self) -> &[Paragraph] {
        &self.spaceport
    }

    /// Description paragraphs, each followed by a newline.
    #[must_use]
    pub fn description(&self) -> String {
        join_paragraphs(&self.description)
    }

    #[must_use]
    pub fn has_spaceport(&self) -> bool {
        !self.spaceport.is_empty()
    }

    #[must_use]
    pub fn spaceport_description(&self) -> String {
        join_paragraphs(&self.spaceport)
    }

    #[must_use]
    pub fn shipyards(&self) -> &Vec<String> {
        &self.shipyards
    }

    pub fn shipyards_mut(&mut self) -> &mut Vec<String> {
        &mut self.shipyards
    }

    #[must_use]
    pub fn outfitters(&self) -> &Vec<String> {
        &self.outfitters
    }

    pub fn outfitters_mut(&mut self) -> &mut Vec<String> {
        &mut self.outfitters
    }

    /// Empty if the planet uses its system's government.
    #[must_use]
    pub fn government(&self) -> &str {
        &self.government
    }

    #[must_use]
    pub fn required_reputation(&self) -> Option<f64> {
        self.required_reputation
    }

    #[must_use]
    pub fn bribe(&self) -> Option<f64> {
        self.bribe
    }

    #[must_use]
    pub fn security(&self) -> Option<f64> {
        self.security
    }

    #[must_use]
    pub fn tribute(&self) -> Option<f64> {
        self.tribute
    }

    #[must_use]
    pub fn tribute_threshold(&self) -> Option<f64> {
        self.tribute_threshold
    }

    #[must_use]
    pub fn tribute_fleets(&self) -> &Vec<TributeFleet> {
        &self.tribute_fleets
    }

    pub fn tribute_fleets_mut(&mut self) -> &mut Vec<TributeFleet> {
        &mut self.tribute_fleets
    }

    #[must_use]
    pub fn unparsed(&self) -> &[DataNode] {
        &self.unparsed
    }

    /// Changes the key only; stellar objects are renamed by the registry.
    pub(crate) fn set_true_name(&mut self, name: impl Into<String>) {
        self.name.set_true_name(name);
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.name.set_display_name(name);
    }

    pub fn set_landscape(&mut self, sprite: impl Into<String>) {
        self.landscape = sprite.into();
    }

    pub fn set_music(&mut self, music: impl Into<String>) {
        self.music = music.into();
    }

    /// Replaces the description with one paragraph per non-empty line.
    /// Nodes attached to the old paragraphs are dropped.
    pub fn set_description(&mut self, text: &str) {
        self.description = split_paragraphs(text);
    }

    pub fn set_spaceport_description(&mut self, text: &str) {
        self.spaceport = split_paragraphs(text);
    }

    pub fn set_government(&mut self, government: impl Into<String>) {
        self.government = government.into();
    }

    pub fn set_required_reputation(&mut self, value: Option<f64>) {
        self.required_reputation = value;
    }

    pub fn set_bribe(&mut self, value: Option<f64>) {
        self.bribe = value;
    }

    pub fn set_security(&mut self, value: Option<f64>) {
        self.security = value;
    }

    /// Clearing the tribute drops the whole tribute block on save.
    pub fn set_tribute(&mut self, value: Option<f64>) {
        self.tribute = value;
    }

    pub fn set_tribute_threshold(&mut self, value: Option<f64>) {
        self.tribute_threshold = value;
    }
}

fn paragraph(node: &DataNode) -> Paragraph {
    Paragraph {
        text: node.token(1).to_string(),
        children: node.children().to_vec(),
    }
}

fn join_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs.iter().fold(String::new(), |mut text, paragraph| {
        text.push_str(&paragraph.text);
        text.push('\n');
        text
    })
}

fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(Paragraph::new)
        .collect()
}

fn save_paragraphs(file: &mut DataWriter, keyword: &str, paragraphs: &[Paragraph]) {
    for paragraph in paragraphs {
        file.write(&[&keyword, &paragraph.text]);
        if !paragraph.children.is_empty() {
            file.begin_child();
            for child in &paragraph.children {
                file.write_node(child);
            }
            file.end_child();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataFile, WriterOptions};

    const EARTH: &str = "\
planet Earth
\t\"display name\" Terra
\tattributes urban core
\tlandscape land/sky2
\tdescription \"Blue and green.\"
\tdescription `The \"cradle\" of humanity.`
\t\tto display
\t\t\thas \"visited Earth\"
\tspaceport \"Busy.\"
\tshipyard \"Basic Ships\"
\toutfitter \"Common Outfits\"
\tbribe 0.01
\tsecurity 0.8
\ttribute 5000
\t\tthreshold 4000
\t\tfleet \"Large Republic\" 6
\t\tfleet Militia
\tlocation inner
";

    fn parse_planet(text: &str) -> Planet {
        Planet::from_node(&DataFile::parse(text).root().children()[0])
    }

    fn saved(planet: &Planet) -> String {
        let mut file = DataWriter::new(WriterOptions::default());
        planet.save(&mut file);
        file.into_inner()
    }

    #[test]
    fn test_round_trip() {
        let planet = parse_planet(EARTH);
        assert_eq!(planet.display_name(), "Terra");
        assert_eq!(planet.attributes(), &vec!["urban", "core"]);
        assert_eq!(planet.required_reputation(), None);
        assert_eq!(planet.tribute_fleets()[0], TributeFleet::new("Large Republic", 6));
        assert_eq!(planet.tribute_fleets()[1].count, 1);
        assert_eq!(planet.unparsed().len(), 1);
        assert_eq!(saved(&planet), EARTH);
    }

    #[test]
    fn test_display_name_and_attributes_are_both_written() {
        let mut planet = Planet::named("Mars");
        planet.set_display_name("Red Planet");
        planet.attributes_mut().push("mining".into());
        let text = saved(&planet);
        assert!(text.contains("\tdisplay name \"Red Planet\"\n"));
        assert!(text.contains("\tattributes mining\n"));
    }

    #[test]
    fn test_description_text() {
        let mut planet = parse_planet(EARTH);
        assert_eq!(
            planet.description(),
            "Blue and green.\nThe \"cradle\" of humanity.\n"
        );
        planet.set_description("First.\n\nSecond.");
        assert_eq!(planet.paragraphs().len(), 2);
        assert!(planet.paragraphs()[1].children.is_empty());
        assert!(planet.has_spaceport());
        planet.set_spaceport_description("");
        assert!(!planet.has_spaceport());
    }

    #[test]
    fn test_cleared_tribute_drops_block() {
        let mut planet = parse_planet(EARTH);
        planet.set_tribute(None);
        let text = saved(&planet);
        assert!(!text.contains("tribute"));
        assert!(!text.contains("threshold"));
    }
}
