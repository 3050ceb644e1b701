//! Raw scene fixtures: builders for authored content in tests.

use novella_content::domain::raw::{
    RawBranch, RawCharacter, RawChoice, RawDialogue, RawEffects, RawRequirements, RawScene,
    RawSkillCheck,
};

/// Builder for a [`RawScene`].
#[derive(Debug, Clone, Default)]
pub struct SceneFixture {
    scene: RawScene,
}

impl SceneFixture {
    /// Starts a scene with the given id and nothing else.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            scene: RawScene {
                id: id.to_owned(),
                ..RawScene::default()
            },
        }
    }

    /// Appends a dialogue line spoken by a free-text speaker.
    #[must_use]
    pub fn line(mut self, speaker: &str, text: &str) -> Self {
        self.scene.dialogue.push(RawDialogue {
            speaker: Some(speaker.to_owned()),
            text: text.to_owned(),
            ..RawDialogue::default()
        });
        self
    }

    /// Declares a character, optionally with a portrait.
    #[must_use]
    pub fn character(mut self, id: &str, name: &str, portrait_url: Option<&str>) -> Self {
        self.scene.characters.push(RawCharacter {
            id: id.to_owned(),
            name: name.to_owned(),
            portrait_url: portrait_url.map(str::to_owned),
            color: None,
        });
        self
    }

    #[must_use]
    pub fn background(mut self, path: &str) -> Self {
        self.scene.background = Some(path.to_owned());
        self
    }

    #[must_use]
    pub fn music(mut self, path: &str) -> Self {
        self.scene.music = Some(path.to_owned());
        self
    }

    /// Sets the implicit `nextScene` transition.
    #[must_use]
    pub fn next(mut self, target: &str) -> Self {
        self.scene.next_scene = Some(target.to_owned());
        self
    }

    /// Appends a choice.
    #[must_use]
    pub fn choice(mut self, choice: RawChoice) -> Self {
        self.scene.choices.get_or_insert_with(Vec::new).push(choice);
        self
    }

    /// Marks the scene as an intended ending.
    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.scene.is_terminal = true;
        self
    }

    #[must_use]
    pub fn build(self) -> RawScene {
        self.scene
    }
}

/// Builder for a [`RawChoice`].
#[derive(Debug, Clone, Default)]
pub struct ChoiceFixture {
    choice: RawChoice,
}

impl ChoiceFixture {
    /// Starts a choice leading to `target`; the label defaults to the id.
    #[must_use]
    pub fn new(id: &str, target: &str) -> Self {
        Self {
            choice: RawChoice {
                id: id.to_owned(),
                text: id.to_owned(),
                next_scene: Some(target.to_owned()),
                ..RawChoice::default()
            },
        }
    }

    fn requirements(&mut self) -> &mut RawRequirements {
        self.choice
            .requirements
            .get_or_insert_with(RawRequirements::default)
    }

    fn effects(&mut self) -> &mut RawEffects {
        self.choice.effects.get_or_insert_with(RawEffects::default)
    }

    /// Requires `flag` to be set.
    #[must_use]
    pub fn requires(mut self, flag: &str) -> Self {
        self.requirements().flags.push(flag.to_owned());
        self
    }

    /// Requires `flag` to be unset.
    #[must_use]
    pub fn forbids(mut self, flag: &str) -> Self {
        self.requirements().not_flags.push(flag.to_owned());
        self
    }

    /// Sets `flag` when taken.
    #[must_use]
    pub fn sets(mut self, flag: &str) -> Self {
        self.effects().add_flags.push(flag.to_owned());
        self
    }

    /// Clears `flag` when taken.
    #[must_use]
    pub fn clears(mut self, flag: &str) -> Self {
        self.effects().remove_flags.push(flag.to_owned());
        self
    }

    /// Adds a skill check with the given raw difficulty.
    #[must_use]
    pub fn skill_check(mut self, skill: &str, difficulty: f64) -> Self {
        self.choice.skill_check = Some(RawSkillCheck {
            skill: skill.to_owned(),
            difficulty,
            ..RawSkillCheck::default()
        });
        self
    }

    /// Routes the success outcome to `target`.
    #[must_use]
    pub fn on_success(mut self, target: &str) -> Self {
        self.effects().on_success = Some(RawBranch {
            next_scene: Some(target.to_owned()),
            ..RawBranch::default()
        });
        self
    }

    /// Routes the failure outcome to `target`.
    #[must_use]
    pub fn on_failure(mut self, target: &str) -> Self {
        self.effects().on_failure = Some(RawBranch {
            next_scene: Some(target.to_owned()),
            ..RawBranch::default()
        });
        self
    }

    #[must_use]
    pub fn build(self) -> RawChoice {
        self.choice
    }
}
