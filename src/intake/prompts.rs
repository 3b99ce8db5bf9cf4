//! Anna's lines. The step prompts are indexed by the step they introduce.

pub const PURPOSE: &str = "";

pub const STYLES: &str =
    "Kies 1–2 stijlen: minimalistisch, casual, klassiek, sportief, creatief.";

pub const GENDER_FIT: &str = "Welke gender/pasvorm wil je dat ik aanhoud? Typ bijv. male recht of female relaxed. Zeg skip = unisex.";

pub const AGE_RANGE: &str = "Welke leeftijdscategorie? 18–25 / 26–35 / 36–45 / 46–55 / 56+.";

pub const COUNTRY: &str = "In welk land bestel je? (bijv. NL, BE, DE, FR, UK, US).";

pub const BUDGET: &str = "Wat is je totaalbudget? Typ een bedrag, bijv. 250.";

pub const SIZES: &str =
    "Wat zijn je maten? Typ bijv. broekmaat 50, bovenmaat L, schoenmaat 43. Of zeg skip.";

pub const COLORS: &str =
    "Favoriete kleuren (optioneel)? Typ 1–3, bv. navy, olijf, wit. Of zeg skip.";

pub const ACCESSIBILITY: &str = "Toegankelijkheidswensen (optioneel): typ woorden zoals elastic waist, soft fabrics, easy closures, pull-on. Of skip.";

pub const CONFIRM: &str = "Top! Zal ik nu 3 outfits genereren? Typ ja om te starten.";

/// Re-prompt after a non-affirmative confirmation.
pub const CONFIRM_AGAIN: &str = "Geen probleem. Zeg het als je klaar bent met ja.";

pub const GENERATING: &str = "Top, ik ga voor je aan de slag ✅ Een momentje…";

/// The only error text a user ever sees.
pub const GENERATION_FAILED: &str =
    "Hm, dat ging mis. Probeer je instellingen te checken of draai in demo-modus.";

pub const SETTINGS_SAVED: &str = "Instellingen opgeslagen ✅";

pub const INDEPENDENT_NOTE: &str = "Onthoud: ik ben onafhankelijk, geen affiliate of commissies.";
