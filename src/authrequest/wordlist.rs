//! Fixed wordlist for fingerprint phrases. 256 entries, so each word
//! encodes exactly one byte of derived key material. The list must never be
//! reordered or edited: phrases derived from it are compared across devices.

pub(crate) const WORDS: [&str; 256] = [
    "able", "acid", "acorn", "actor", "adapt", "admit", "adopt", "aged",
    "agent", "agree", "ahead", "aim", "alarm", "album", "alert", "alike",
    "alley", "alloy", "ally", "almond", "aloft", "alpha", "amber", "amend",
    "ample", "anchor", "angle", "ankle", "annual", "answer", "antic", "apart",
    "apple", "apron", "arch", "arena", "argue", "arise", "armor", "arrow",
    "ash", "aspen", "asset", "atlas", "atom", "attic", "audio", "august",
    "aunt", "auto", "avid", "await", "awake", "award", "axis", "bacon",
    "badge", "bagel", "baker", "balmy", "bamboo", "banjo", "barge", "basil",
    "baton", "bay", "beacon", "beam", "bean", "bear", "beech", "belt",
    "bench", "berry", "bike", "birch", "bison", "blade", "blank", "blaze",
    "blend", "bliss", "bloom", "blue", "board", "boast", "bolt", "bonus",
    "book", "boost", "born", "bough", "bound", "bow", "brace", "braid",
    "brass", "brave", "bread", "breeze", "brick", "bridge", "brisk", "broad",
    "brook", "broom", "brown", "brush", "buck", "bud", "budge", "buff",
    "bugle", "bulb", "bunch", "bundle", "bunny", "burst", "bush", "butter",
    "cabin", "cable", "cactus", "camel", "camp", "canal", "candle", "canoe",
    "canyon", "cape", "carbon", "cargo", "carol", "carve", "castle", "cause",
    "cedar", "cellar", "chalk", "charm", "chart", "chase", "cheer", "chess",
    "chief", "chill", "choir", "chord", "cider", "cinder", "circle", "citrus",
    "civic", "clad", "claim", "clamp", "clash", "clasp", "clay", "clean",
    "clear", "cliff", "climb", "cloak", "clock", "cloud", "clover", "coach",
    "coast", "cobalt", "cocoa", "coil", "comet", "cone", "coral", "cord",
    "cork", "corn", "cost", "cotton", "couch", "count", "cove", "cozy",
    "craft", "crane", "crate", "credit", "creek", "crest", "crew", "crisp",
    "crop", "crown", "cube", "cubic", "cue", "cuff", "curb", "curl",
    "curve", "cycle", "daily", "dairy", "daisy", "dance", "dandy", "dart",
    "dash", "dawn", "dazzle", "decade", "decal", "decor", "deed", "deep",
    "deer", "delta", "denim", "depot", "derby", "desk", "dew", "dial",
    "diary", "dice", "diesel", "digit", "dime", "diner", "dingy", "dip",
    "dish", "dock", "dome", "donor", "dot", "dove", "dozen", "draft",
    "dragon", "drape", "draw", "dress", "drift", "drill", "drum", "dry",
    "duck", "dune", "duo", "dusk", "dust", "duty", "eager", "eagle",
];
