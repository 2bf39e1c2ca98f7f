//! The screen-flow state machine.
//!
//! Each interaction screen is a named state; user actions and exchange
//! outcomes are events.  [`transition`] is the single place where
//! (state, event) pairs map to the next state, so the whole flow can be
//! inspected and tested without instantiating any UI or socket.
//!
//! ```text
//! Welcome ── ChooseLogin ──────> Login ── AuthSucceeded ──> MainMenu ── Dismissed ──> Exit
//!    │  └── ChooseRegister ───> Register ─ AuthSucceeded ──┘
//!    │         Login/Register ── GoBack ──> Welcome
//!    │         Login/Register ── AuthFailed ──> (stay, error shown)
//!    └── CloseRequested (any screen) ──> Exit
//! ```

/// The interaction screens of the client.
///
/// `MainMenu`'s onward screens (Search / Book / Cancel) are unimplemented
/// placeholders; dismissing the menu ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Welcome,
    Login,
    Register,
    MainMenu,
    /// Terminal pseudo-state: the session ends and the channel is released.
    Exit,
}

/// Events that drive screen transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// User chose "Login" on the Welcome screen.
    ChooseLogin,
    /// User chose "Register" on the Welcome screen.
    ChooseRegister,
    /// User pressed "Back" on a form screen.
    GoBack,
    /// User closed the window; terminal from every screen.
    CloseRequested,
    /// Submit passed validation and the server answered `success`.
    AuthSucceeded,
    /// Submit failed: validation error, negative response, or lost
    /// connection.  The active screen is re-shown with a message.
    AuthFailed,
    /// The main menu was dismissed.
    Dismissed,
}

/// Maps (state, event) to the next state.
///
/// Events that make no sense for the current screen leave it unchanged;
/// handlers only emit events their screen produces, so such pairs are
/// unreachable in practice but total here.
pub fn transition(screen: Screen, event: ScreenEvent) -> Screen {
    use Screen::*;
    use ScreenEvent::*;

    match (screen, event) {
        (_, CloseRequested) => Exit,

        (Welcome, ChooseLogin) => Login,
        (Welcome, ChooseRegister) => Register,

        (Login | Register, GoBack) => Welcome,
        (Login | Register, AuthSucceeded) => MainMenu,
        (Login | Register, AuthFailed) => screen,

        (MainMenu, Dismissed) => Exit,

        (current, _) => current,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
