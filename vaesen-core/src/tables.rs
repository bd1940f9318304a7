//! Static reference data: archetypes, talents, mementos, critical injuries,
//! headquarters upgrades and the standard conditions.
//!
//! Built once into [`TABLES`] and passed around as `&RulesTables`.

use crate::headquarters::Prerequisite;
use crate::world::{
    Archetype, Attribute, Condition, ConditionKind, DefectInsight, Skill, Upgrade, UpgradeType,
};

/// Questions asked at the end of a mystery; each "yes" is worth 1 XP.
pub const XP_QUESTIONS: [&str; 8] = [
    "Did you participate in the session?",
    "Did you confront any vaesen?",
    "Did you identify a previously unknown vaesen?",
    "Were you affected by your Dark Secret?",
    "Did you take risks to protect other people?",
    "Have you learned anything? (what?)",
    "Did you develop something in your headquarters?",
    "Did you perform an extraordinary action?",
];

/// The six conditions every character carries, all inactive.
pub fn standard_conditions() -> Vec<Condition> {
    vec![
        Condition::new("Exhausted", ConditionKind::Physical),
        Condition::new("Battered", ConditionKind::Physical),
        Condition::new("Wounded", ConditionKind::Physical),
        Condition::new("Angry", ConditionKind::Mental),
        Condition::new("Frightened", ConditionKind::Mental),
        Condition::new("Hopeless", ConditionKind::Mental),
    ]
}

/// An upgrade from the catalog with its prerequisite already parsed.
#[derive(Debug, Clone)]
pub struct CatalogUpgrade {
    pub upgrade: Upgrade,
    pub prerequisite: Prerequisite,
}

/// Talent name and rules text.
#[derive(Debug, Clone)]
pub struct TalentInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// All reference data needed by the engine.
#[derive(Debug, Clone)]
pub struct RulesTables {
    pub archetypes: Vec<Archetype>,
    pub talents: Vec<TalentInfo>,
    pub mementos: Vec<&'static str>,
    pub physical_injuries: Vec<DefectInsight>,
    pub mental_injuries: Vec<DefectInsight>,
    pub upgrades: Vec<CatalogUpgrade>,
}

lazy_static::lazy_static! {
    /// The standard tables.
    pub static ref TABLES: RulesTables = RulesTables::standard();
}

impl RulesTables {
    /// Build the standard tables.
    pub fn standard() -> Self {
        Self::new(
            archetypes(),
            talents(),
            mementos(),
            injuries(ConditionKind::Physical),
            injuries(ConditionKind::Mental),
            upgrades(),
        )
    }

    /// Build tables from custom data, parsing every prerequisite once.
    pub fn new(
        archetypes: Vec<Archetype>,
        talents: Vec<TalentInfo>,
        mementos: Vec<&'static str>,
        physical_injuries: Vec<DefectInsight>,
        mental_injuries: Vec<DefectInsight>,
        upgrades: Vec<Upgrade>,
    ) -> Self {
        let upgrades = upgrades
            .into_iter()
            .map(|upgrade| CatalogUpgrade {
                prerequisite: Prerequisite::parse(&upgrade.prerequisite),
                upgrade,
            })
            .collect();

        Self {
            archetypes,
            talents,
            mementos,
            physical_injuries,
            mental_injuries,
            upgrades,
        }
    }

    /// Find an archetype by name (case-insensitive).
    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.archetypes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn talent_description(&self, name: &str) -> Option<&'static str> {
        self.talents
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.description)
    }

    pub fn upgrade(&self, id: &str) -> Option<&CatalogUpgrade> {
        self.upgrades.iter().find(|u| u.upgrade.id == id)
    }

    pub fn upgrade_named(&self, name: &str) -> Option<&CatalogUpgrade> {
        self.upgrades.iter().find(|u| u.upgrade.name == name)
    }

    pub fn injuries(&self, kind: ConditionKind) -> &[DefectInsight] {
        match kind {
            ConditionKind::Physical => &self.physical_injuries,
            ConditionKind::Mental => &self.mental_injuries,
        }
    }

    /// Look up a critical injury in either catalog.
    pub fn injury(&self, name: &str) -> Option<&DefectInsight> {
        self.physical_injuries
            .iter()
            .chain(self.mental_injuries.iter())
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn archetype(
    name: &str,
    description: &str,
    main_attribute: Attribute,
    main_skill: Skill,
    talents: &[&str],
    equipment: &[&str],
    resources: (u8, u8),
    motivations: &[&str],
    traumas: &[&str],
    dark_secrets: &[&str],
    relationships: &[&str],
) -> Archetype {
    Archetype {
        name: name.to_string(),
        description: description.to_string(),
        main_attribute,
        main_skill,
        talents: strings(talents),
        equipment: strings(equipment),
        resources,
        motivations: strings(motivations),
        traumas: strings(traumas),
        dark_secrets: strings(dark_secrets),
        relationships: strings(relationships),
    }
}

fn archetypes() -> Vec<Archetype> {
    vec![
        archetype(
            "Academic",
            "A scholar who trusts books more than rumours.",
            Attribute::Logic,
            Skill::Learning,
            &["Bookworm", "Erudite", "Knowledge is Reassuring"],
            &["Book collection", "Pen and ink or Magnifying glass", "Pocket watch"],
            (4, 6),
            &["You seek the truth behind the old tales.", "You want to finish the work your mentor began."],
            &["You saw a colleague dragged into the dark.", "Your first expedition returned without you."],
            &["You plagiarised your most famous paper.", "You owe money to dangerous people."],
            &["A former student who still writes to you.", "A rival at the university."],
        ),
        archetype(
            "Doctor",
            "A physician who has seen wounds no textbook describes.",
            Attribute::Logic,
            Skill::Medicine,
            &["Chief Physician", "Emergency Medicine", "Sawbones"],
            &["Doctor's bag", "Morphine or Liquor", "Notebook"],
            (3, 5),
            &["You want to cure what others call a curse.", "You cannot let a patient die again."],
            &["A patient died under your knife.", "You treated a wound made by no animal."],
            &["You are addicted to laudanum.", "You buried a mistake."],
            &["A nurse who trusts you completely.", "The family of a patient you lost."],
        ),
        archetype(
            "Hunter",
            "A tracker at home in the deep forest.",
            Attribute::Precision,
            Skill::RangedCombat,
            &["Eagle Eye", "Hunting Instincts", "Lone Wolf"],
            &["Rifle", "Hunting knife", "Bear trap or Hunting dog"],
            (1, 3),
            &["You hunt the thing that took your family.", "You protect the forest and its people."],
            &["You shot something that spoke.", "Your dog came home alone."],
            &["You poach on the baron's land.", "You once left a companion to die."],
            &["A farmer who buys your pelts.", "The gamekeeper who wants you gone."],
        ),
        archetype(
            "Occultist",
            "A seeker of the hidden world behind the visible one.",
            Attribute::Empathy,
            Skill::Observation,
            &["Exorcist", "Magic Circle", "Sixth Sense"],
            &["Occult tome", "Ritual candles or Tarot deck", "Silver amulet"],
            (2, 4),
            &["You want to see the other side with your own eyes.", "You seek to break a family curse."],
            &["A seance went horribly wrong.", "You heard your dead mother call your name."],
            &["You made a pact you do not understand.", "Your spirit guide lies to you."],
            &["A medium who fears you.", "A sceptical journalist."],
        ),
        archetype(
            "Officer",
            "A soldier used to command and to danger.",
            Attribute::Physique,
            Skill::CloseCombat,
            &["Tactician", "Fencer", "Battle-Hardened"],
            &["Sabre or Revolver", "Uniform", "Field glasses"],
            (3, 5),
            &["Duty demands that you protect the innocent.", "You want the medal your father never won."],
            &["Your company was wiped out in the night.", "You gave an order that killed your friend."],
            &["You deserted once.", "You are not who your papers say."],
            &["Your loyal batman.", "A superior who despises you."],
        ),
        archetype(
            "Priest",
            "A servant of the church who has met real evil.",
            Attribute::Empathy,
            Skill::Inspiration,
            &["Confessor", "Faith", "Preacher"],
            &["Bible", "Holy water or Crucifix", "Cassock"],
            (3, 5),
            &["You fight the devil's work wherever it hides.", "You seek to restore your lost faith."],
            &["You failed to save a possessed child.", "Your church burned with the congregation inside."],
            &["You no longer believe.", "You broke the seal of confession."],
            &["A parishioner who brings you gossip.", "The bishop who watches you closely."],
        ),
        archetype(
            "Private Detective",
            "An investigator for hire with a nose for lies.",
            Attribute::Precision,
            Skill::Investigation,
            &["Bloodhound", "Gut Feeling", "Shadowing"],
            &["Revolver or Lockpicks", "Notebook", "Disguise kit"],
            (2, 4),
            &["Every mystery must be solved.", "You need to clear your own name."],
            &["The murderer you caught was not human.", "A client vanished from a locked room."],
            &["You work for a criminal.", "You framed an innocent man."],
            &["A police constable who owes you.", "An informant in the docks."],
        ),
        archetype(
            "Servant",
            "A loyal helper who notices what the masters miss.",
            Attribute::Physique,
            Skill::Vigilance,
            &["Loyal", "Invisible", "Quick Hands"],
            &["Livery", "Kitchen knife or Lantern", "Ring of keys"],
            (1, 3),
            &["You protect the family you serve.", "You want a life of your own."],
            &["You found your master's body.", "Something walked the halls at night."],
            &["You steal from the household.", "You are the master's illegitimate child."],
            &["The cook who shares your secrets.", "The young lady of the house."],
        ),
        archetype(
            "Vagabond",
            "A wanderer who knows every road and ditch.",
            Attribute::Physique,
            Skill::Stealth,
            &["Street Smart", "Survivor", "Traveller"],
            &["Walking stick", "Bindle or Fiddle", "Flask"],
            (1, 2),
            &["You want to be free of all masters.", "You look for a place to call home."],
            &["You slept in a barrow and woke somewhere else.", "Your companion was taken on the road."],
            &["You are wanted for murder.", "You were born into a wealthy family."],
            &["A tavern keeper who feeds you.", "A parish constable who knows your face."],
        ),
        archetype(
            "Writer",
            "A chronicler of wonders and horrors.",
            Attribute::Logic,
            Skill::Inspiration,
            &["Wordsmith", "Journalist", "Inspiring"],
            &["Typewriter or Notebooks", "Fountain pen", "Letters of introduction"],
            (2, 4),
            &["You will write the book that shows the world the truth.", "You chase the story no one else dares."],
            &["Your manuscript predicted a real death.", "The thing you wrote about came to visit."],
            &["Your best work was stolen.", "You invent your sources."],
            &["Your publisher.", "A reader who writes you unsettling letters."],
        ),
    ]
}

fn talents() -> Vec<TalentInfo> {
    let entries: [(&'static str, &'static str); 30] = [
        ("Bookworm", "Gain +2 to Learning when researching in a library."),
        ("Erudite", "Use Learning instead of Manipulation when dealing with the educated."),
        ("Knowledge is Reassuring", "Ignore one mental condition when studying the unknown."),
        ("Chief Physician", "Allies you treat recover one extra condition."),
        ("Emergency Medicine", "Treat critical injuries without penalty."),
        ("Sawbones", "Perform surgery anywhere without tools."),
        ("Eagle Eye", "No penalty for long-range shots."),
        ("Hunting Instincts", "Gain +2 to Vigilance when tracking."),
        ("Lone Wolf", "Gain +1 to all tests when acting alone."),
        ("Exorcist", "Use Inspiration to drive out possessing vaesen."),
        ("Magic Circle", "Draw a circle that vaesen cannot cross for one scene."),
        ("Sixth Sense", "Roll Observation to sense a hidden vaesen."),
        ("Tactician", "Give allies +1 on initiative."),
        ("Fencer", "Parry with a blade without penalty."),
        ("Battle-Hardened", "Ignore the first physical condition in combat."),
        ("Confessor", "Gain +2 to Manipulation when hearing confessions."),
        ("Faith", "Reroll one die in a Fear test."),
        ("Preacher", "Inspire a crowd to act."),
        ("Bloodhound", "Gain +2 to Investigation at a crime scene."),
        ("Gut Feeling", "Ask the game master one yes-or-no question per mystery."),
        ("Shadowing", "Follow someone unseen through a town."),
        ("Loyal", "Take a condition in an ally's place."),
        ("Invisible", "People of rank do not notice you."),
        ("Quick Hands", "Steal small objects without a test."),
        ("Street Smart", "Always find a bed and a meal."),
        ("Survivor", "Gain +2 to Agility when fleeing."),
        ("Traveller", "Know the roads; never get lost."),
        ("Wordsmith", "Use Inspiration to calm a frightened person."),
        ("Journalist", "Gain access to newspaper archives."),
        ("Inspiring", "Give an ally +1 on their next test."),
    ];
    entries
        .into_iter()
        .map(|(name, description)| TalentInfo { name, description })
        .collect()
}

fn mementos() -> Vec<&'static str> {
    vec![
        "A faded photograph of a loved one",
        "A silver locket that no longer opens",
        "A child's wooden toy",
        "A letter you have never dared to read",
        "A pressed flower from your mother's grave",
        "A broken compass that still points somewhere",
        "A lucky coin from your first wage",
        "A lock of hair tied with red thread",
    ]
}

fn injuries(kind: ConditionKind) -> Vec<DefectInsight> {
    let entries: &[(&str, &str)] = match kind {
        ConditionKind::Physical => &[
            ("Broken Ribs", "Every breath hurts; -1 to Force."),
            ("Concussion", "Dizzy spells; -1 to Vigilance."),
            ("Crushed Hand", "Clumsy grip; -1 to Close Combat."),
            ("Limp", "A bad leg; -1 to Agility."),
            ("Lost Eye", "No depth perception; -1 to Ranged Combat."),
            ("Scarred Face", "People remember you; +1 to Manipulation."),
        ],
        ConditionKind::Mental => &[
            ("Nightmares", "Restless nights; -1 to Learning."),
            ("Phobia", "An irrational fear of the vaesen's element."),
            ("Paranoia", "Trust no one; -1 to Inspiration."),
            ("Insomnia", "Never truly rested; -1 to Observation."),
            ("Visions", "Glimpses of the other side; +1 to Observation."),
            ("Nervous Tic", "Hands that never stay still; -1 to Medicine."),
        ],
    };
    entries
        .iter()
        .map(|(name, description)| DefectInsight::new(*name, *description, kind))
        .collect()
}

fn upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade::new("library", "Library", UpgradeType::Facility, "Available from start", 2, "Gain +1 to Learning when researching at the castle."),
        Upgrade::new("chapel", "Chapel", UpgradeType::Facility, "None", 2, "Heal one mental condition per visit."),
        Upgrade::new("laboratory", "Laboratory", UpgradeType::Facility, "Library", 3, "Analyse samples taken from a mystery."),
        Upgrade::new("infirmary", "Infirmary", UpgradeType::Facility, "Doctor or Resources 4", 3, "Heal one physical condition per visit."),
        Upgrade::new("armory", "Armory", UpgradeType::Facility, "Hunter or Resources 3", 3, "Borrow weapons before each mystery."),
        Upgrade::new("workshop", "Workshop", UpgradeType::Facility, "Resources 3", 3, "Repair and modify equipment."),
        Upgrade::new("archive", "Archive", UpgradeType::Facility, "Library & Resources 3", 4, "Old records give +2 to Investigation on local history."),
        Upgrade::new("occult-collection", "Occult Collection", UpgradeType::Facility, "Occultist or Library", 4, "Identify vaesen by their signs."),
        Upgrade::new("observatory", "Observatory", UpgradeType::Facility, "Library & Laboratory", 5, "Predict when the barrier between worlds is thin."),
        Upgrade::new("police-inspector", "Police Inspector", UpgradeType::Contact, "Resources 2", 2, "Access to police reports."),
        Upgrade::new("newspaper-editor", "Newspaper Editor", UpgradeType::Contact, "Available from start", 2, "Place or suppress a story."),
        Upgrade::new("university-scholar", "University Scholar", UpgradeType::Contact, "Archive", 3, "Answers one scholarly question per mystery."),
        Upgrade::new("cook", "Cook", UpgradeType::Personnel, "None", 1, "Hot meals heal one condition after a mystery."),
        Upgrade::new("groundskeeper", "Groundskeeper", UpgradeType::Personnel, "Resources 2", 2, "Keeps watch over the castle grounds."),
        Upgrade::new("secret-passage", "Secret Passage (Discovered)", UpgradeType::Facility, "Archive", 2, "A hidden way out of the castle."),
        Upgrade::new("crypt", "Crypt (Discovered)", UpgradeType::Facility, "Chapel & Occult Collection", 4, "Something sleeps beneath the chapel."),
        Upgrade::new("alchemical-laboratory", "Alchemical Laboratory (Discovered)", UpgradeType::Facility, "Laboratory & Occultist", 5, "Brew remedies against vaesen."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headquarters::Prerequisite;
    use std::collections::HashSet;

    #[test]
    fn test_archetype_data_is_consistent() {
        for archetype in &TABLES.archetypes {
            let (min, max) = archetype.resources;
            assert!(min <= max, "{} has an inverted resources range", archetype.name);
            assert!(!archetype.talents.is_empty());
            assert!(!archetype.motivations.is_empty());
            assert!(!archetype.traumas.is_empty());
            assert!(!archetype.dark_secrets.is_empty());
            for talent in &archetype.talents {
                assert!(
                    TABLES.talent_description(talent).is_some(),
                    "talent {talent} has no description"
                );
            }
        }
    }

    #[test]
    fn test_upgrade_ids_are_unique() {
        let ids: HashSet<_> = TABLES.upgrades.iter().map(|u| &u.upgrade.id).collect();
        assert_eq!(ids.len(), TABLES.upgrades.len());
    }

    #[test]
    fn test_catalog_prerequisites_reference_known_upgrades() {
        for entry in &TABLES.upgrades {
            for name in entry.prerequisite.referenced_upgrades() {
                assert!(
                    TABLES.upgrade_named(name).is_some(),
                    "{} references unknown upgrade {name}",
                    entry.upgrade.id
                );
            }
        }
    }

    #[test]
    fn test_prerequisites_parsed_once() {
        let infirmary = TABLES.upgrade("infirmary").unwrap();
        assert!(matches!(infirmary.prerequisite, Prerequisite::Or(_)));
        let library = TABLES.upgrade("library").unwrap();
        assert_eq!(library.prerequisite, Prerequisite::Always);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(TABLES.archetype("private detective").is_some());
        assert!(TABLES.injury("broken ribs").is_some());
        assert!(TABLES.archetype("Necromancer").is_none());
    }

    #[test]
    fn test_standard_conditions() {
        let conditions = standard_conditions();
        assert_eq!(conditions.len(), 6);
        assert_eq!(
            conditions.iter().filter(|c| c.kind == ConditionKind::Physical).count(),
            3
        );
        assert!(conditions.iter().all(|c| !c.active));
    }
}
