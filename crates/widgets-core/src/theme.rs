//! Light/dark theming for widgets.
//!
//! Renderers never read styling state directly. They get a `Palette` value,
//! resolved from per-scheme defaults plus whatever token values the host page
//! supplied, and refreshed when the resolver notifies its subscribers.

use std::collections::HashMap;

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (surrounding whitespace allowed).
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Self::rgb8(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Self::rgb8(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    #[default]
    Light,
    Dark,
}

impl Scheme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Scheme::Dark
        } else {
            Scheme::Light
        }
    }
}

const TOKEN_COUNT: usize = 12;

/// Named visual tokens. The host exposes them as `--widget-<name>` style variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Background,
    Felt,
    Rail,
    Body,
    BodyOutline,
    Cue,
    AimGuide,
    FrictionLoss,
    InelasticLoss,
    Kinetic,
    Axis,
    NowMarker,
}

impl Token {
    pub const ALL: [Token; TOKEN_COUNT] = [
        Token::Background,
        Token::Felt,
        Token::Rail,
        Token::Body,
        Token::BodyOutline,
        Token::Cue,
        Token::AimGuide,
        Token::FrictionLoss,
        Token::InelasticLoss,
        Token::Kinetic,
        Token::Axis,
        Token::NowMarker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Token::Background => "background",
            Token::Felt => "felt",
            Token::Rail => "rail",
            Token::Body => "body",
            Token::BodyOutline => "body-outline",
            Token::Cue => "cue",
            Token::AimGuide => "aim-guide",
            Token::FrictionLoss => "friction-loss",
            Token::InelasticLoss => "inelastic-loss",
            Token::Kinetic => "kinetic",
            Token::Axis => "axis",
            Token::NowMarker => "now-marker",
        }
    }

    /// Accepts the bare name or the `--widget-` prefixed variable name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix("--widget-").unwrap_or(name);
        Token::ALL.into_iter().find(|t| t.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }

    fn default_color(self, scheme: Scheme) -> Color {
        match (scheme, self) {
            (Scheme::Light, Token::Background) => Color::rgb8(0xfa, 0xf8, 0xf3),
            (Scheme::Light, Token::Felt) => Color::rgb8(0x2e, 0x7d, 0x4f),
            (Scheme::Light, Token::Rail) => Color::rgb8(0x6b, 0x43, 0x22),
            (Scheme::Light, Token::Body) => Color::rgb8(0xfd, 0xfd, 0xf8),
            (Scheme::Light, Token::BodyOutline) => Color::rgb8(0x22, 0x22, 0x22),
            (Scheme::Light, Token::Cue) => Color::rgb8(0xc8, 0x9b, 0x5a),
            (Scheme::Light, Token::AimGuide) => Color::rgba8(0xff, 0xff, 0xff, 0x88),
            (Scheme::Light, Token::FrictionLoss) => Color::rgb8(0xe0, 0x8a, 0x3c),
            (Scheme::Light, Token::InelasticLoss) => Color::rgb8(0xc0, 0x3a, 0x4a),
            (Scheme::Light, Token::Kinetic) => Color::rgb8(0x3a, 0x78, 0xc0),
            (Scheme::Light, Token::Axis) => Color::rgb8(0x55, 0x55, 0x55),
            (Scheme::Light, Token::NowMarker) => Color::rgb8(0x11, 0x11, 0x11),

            (Scheme::Dark, Token::Background) => Color::rgb8(0x1a, 0x1b, 0x1e),
            (Scheme::Dark, Token::Felt) => Color::rgb8(0x1f, 0x5a, 0x39),
            (Scheme::Dark, Token::Rail) => Color::rgb8(0x3d, 0x27, 0x15),
            (Scheme::Dark, Token::Body) => Color::rgb8(0xe8, 0xe8, 0xe0),
            (Scheme::Dark, Token::BodyOutline) => Color::rgb8(0x08, 0x08, 0x08),
            (Scheme::Dark, Token::Cue) => Color::rgb8(0xb0, 0x86, 0x4c),
            (Scheme::Dark, Token::AimGuide) => Color::rgba8(0xff, 0xff, 0xff, 0x55),
            (Scheme::Dark, Token::FrictionLoss) => Color::rgb8(0xf0, 0xa0, 0x50),
            (Scheme::Dark, Token::InelasticLoss) => Color::rgb8(0xe0, 0x5a, 0x6a),
            (Scheme::Dark, Token::Kinetic) => Color::rgb8(0x5a, 0x9a, 0xe8),
            (Scheme::Dark, Token::Axis) => Color::rgb8(0xaa, 0xaa, 0xaa),
            (Scheme::Dark, Token::NowMarker) => Color::rgb8(0xee, 0xee, 0xee),
        }
    }
}

/// Resolved colors for one scheme. Cheap to copy into a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    scheme: Scheme,
    colors: [Color; TOKEN_COUNT],
}

impl Palette {
    /// The built-in colors for a scheme.
    pub fn defaults(scheme: Scheme) -> Self {
        Self {
            scheme,
            colors: Token::ALL.map(|t| t.default_color(scheme)),
        }
    }

    pub fn get(&self, token: Token) -> Color {
        self.colors[token.index()]
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::defaults(Scheme::Light)
    }
}

/// Handle returned by `ThemeResolver::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Listener = Box<dyn FnMut(Scheme)>;

/// Current scheme, host overrides and change subscribers.
///
/// Listeners may fire at any point, including mid-frame; they should only
/// mark their widget dirty and let the next frame pick up `palette()`.
#[derive(Default)]
pub struct ThemeResolver {
    scheme: Scheme,
    overrides: HashMap<(Scheme, Token), Color>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u32,
}

impl ThemeResolver {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Default::default()
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Switch scheme. Subscribers are notified only on an actual change.
    pub fn set_scheme(&mut self, scheme: Scheme) {
        if self.scheme == scheme {
            return;
        }
        self.scheme = scheme;
        log::debug!("theme: scheme -> {:?}", scheme);
        self.notify();
    }

    /// Record a host-provided token value for `scheme`.
    /// Unknown tokens and unparseable colors are ignored. Returns whether the value was taken.
    pub fn set_token(&mut self, scheme: Scheme, name: &str, value: &str) -> bool {
        let Some(token) = Token::from_name(name) else {
            log::debug!("theme: unknown token {:?}", name);
            return false;
        };
        let Some(color) = Color::parse_hex(value) else {
            log::debug!("theme: unparseable color {:?} for {}", value, token.name());
            return false;
        };
        let previous = self.overrides.insert((scheme, token), color);
        if scheme == self.scheme && previous != Some(color) {
            self.notify();
        }
        true
    }

    /// Drop all host overrides for every scheme.
    pub fn clear_tokens(&mut self) {
        if self.overrides.is_empty() {
            return;
        }
        self.overrides.clear();
        self.notify();
    }

    /// Resolve a single token for the current scheme.
    pub fn color(&self, token: Token) -> Color {
        self.overrides
            .get(&(self.scheme, token))
            .copied()
            .unwrap_or_else(|| token.default_color(self.scheme))
    }

    /// Resolve every token for the current scheme.
    pub fn palette(&self) -> Palette {
        Palette {
            scheme: self.scheme,
            colors: Token::ALL.map(|t| self.color(t)),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Scheme) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let scheme = self.scheme;
        for (_, listener) in &mut self.listeners {
            listener(scheme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::parse_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse_hex(" #000000 "), Some(Color::BLACK));
        let c = Color::parse_hex("#ff000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.a - 0.502).abs() < 0.01);
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert_eq!(Color::parse_hex(""), None);
        assert_eq!(Color::parse_hex("red"), None);
        assert_eq!(Color::parse_hex("#12"), None);
        assert_eq!(Color::parse_hex("#gggggg"), None);
        assert_eq!(Color::parse_hex("#ééé"), None);
    }

    #[test]
    fn token_names_round_trip() {
        for token in Token::ALL {
            assert_eq!(Token::from_name(token.name()), Some(token));
        }
        assert_eq!(Token::from_name("--widget-felt"), Some(Token::Felt));
        assert_eq!(Token::from_name("nope"), None);
    }

    #[test]
    fn overrides_apply_only_to_their_scheme() {
        let mut theme = ThemeResolver::new(Scheme::Light);
        assert!(theme.set_token(Scheme::Dark, "felt", "#000000"));
        assert_eq!(theme.color(Token::Felt), Token::Felt.default_color(Scheme::Light));

        theme.set_scheme(Scheme::Dark);
        assert_eq!(theme.palette().get(Token::Felt), Color::BLACK);
    }

    #[test]
    fn bad_token_value_falls_back() {
        let mut theme = ThemeResolver::default();
        assert!(!theme.set_token(Scheme::Light, "felt", "not-a-color"));
        assert_eq!(theme.palette(), Palette::defaults(Scheme::Light));
    }

    #[test]
    fn subscribers_hear_scheme_changes() {
        let mut theme = ThemeResolver::default();
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let id = theme.subscribe(move |_| seen.set(seen.get() + 1));

        theme.set_scheme(Scheme::Dark);
        theme.set_scheme(Scheme::Dark); // no change, no notification
        assert_eq!(hits.get(), 1);

        theme.set_token(Scheme::Dark, "kinetic", "#123456");
        assert_eq!(hits.get(), 2);

        assert!(theme.unsubscribe(id));
        theme.set_scheme(Scheme::Light);
        assert_eq!(hits.get(), 2);
        assert_eq!(theme.subscriber_count(), 0);
    }

    #[test]
    fn schemes_differ() {
        assert_ne!(Palette::defaults(Scheme::Light), Palette::defaults(Scheme::Dark));
    }
}
