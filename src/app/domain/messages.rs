use super::settings::Skin;

/// Everything the input router can ask the presenter to do.
/// Key handlers and toolbar buttons produce these; `Presenter::dispatch` handles them.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Reveal
    Advance,
    Retreat,
    Reset,
    ShowAll,
    Seek(f64),

    // Autoplay
    Play,
    Pause,
    SetSpeedLevel(u32),

    // View
    SwitchSkin(Skin),
    ToggleHistory,

    // Document
    OpenImport,
    ToggleEditMode,
    RunCode,
}
