//! Sequence submission form: default text, example presets, verbatim submission.

use serde::Serialize;

pub const DEFAULT_SEQUENCE: &str = "MGSSHHHHHHSSGLVPRGSHMRGPNPTAASLEASAGPFTVRSFTVSRPSGYGAGTVYYPTNAGGTVGAIAIVPGYTARQSSIKWWGPRLASHGFVVITIDTNSTLDQPSSRSSQQMAALRQVASLNGTSSSPIYGKVDTARMGVMGWSMGGGGSLISAANNPSLKAAAPQAPWDSSTNFSSVTVPTLIFACENDSIAPVNSSALPIYDSMSRNAKQFLEINGGSHSCANSGNSNQALIGKKGVAWMKRFMDNDTRYSTFACENPNSTRVSDFRTANCSLEDPAANKARKEAELAAATAEQ";

const EXAMPLE_1: &str = "MTSKPAAAQPGPSTGTSLSSAPLLDVSDLHMHFPIRRGVLQRAVGYVRAVDGVSLSIARGRTLALVGESGCGKTTAGKAILQLLRPTRGHVRFDG";
const EXAMPLE_2: &str = "AMKRHGLDNYRGYSLGNWVCAAKFESNFNTQATNRNTDGSTDYGILQINSRWWCNDGRTPGSRNLCNIPCSALLSSDITASVNCAKKIVSDGNGMNAWVAWRNRCKGTDVQAWIRGCRL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExamplePreset {
    One,
    Two,
}

impl ExamplePreset {
    pub const ALL: [ExamplePreset; 2] = [ExamplePreset::One, ExamplePreset::Two];

    pub fn label(self) -> &'static str {
        match self {
            ExamplePreset::One => "Sequence example 1",
            ExamplePreset::Two => "Sequence example 2",
        }
    }

    pub fn sequence(self) -> &'static str {
        match self {
            ExamplePreset::One => EXAMPLE_1,
            ExamplePreset::Two => EXAMPLE_2,
        }
    }

    /// Query-string value, `"1"` or `"2"`.
    pub fn key(self) -> &'static str {
        match self {
            ExamplePreset::One => "1",
            ExamplePreset::Two => "2",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// The sequence text field of one session.
///
/// Presets only replace the untouched default. Once the user has submitted
/// their own text, selecting a preset leaves the field alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceForm {
    text: String,
    edited: bool,
    preset: Option<ExamplePreset>,
}

impl Default for SequenceForm {
    fn default() -> Self {
        Self { text: DEFAULT_SEQUENCE.to_string(), edited: false, preset: None }
    }
}

impl SequenceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn preset(&self) -> Option<ExamplePreset> {
        self.preset
    }

    pub fn select_preset(&mut self, preset: ExamplePreset) {
        self.preset = Some(preset);
        if !self.edited {
            self.text = preset.sequence().to_string();
        }
    }

    /// Records the field content exactly as typed.
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.edited = true;
        }
        self.text = text;
    }

    /// The text to send for prediction: no trimming, case folding or alphabet checks.
    pub fn submission(&self) -> &str {
        &self.text
    }
}
