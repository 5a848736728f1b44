mod wappalyzer;

pub use wappalyzer::{
    value_to_dom_rule, value_to_keyed_rule, value_to_pattern_rule, value_to_relation,
    WappalyzerOriginalTechRule, WappalyzerParser,
};
