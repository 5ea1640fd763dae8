//! Lineage flattening
//!
//! A derivation chain is a tree: each node may branch into several children
//! (think Eevee). Flattening yields every node once, parents before children,
//! siblings in listed order.

use crate::models::ChainLink;

/// Pre-order walk of the chain using an explicit stack, so deep chains do not
/// grow the call stack.
pub fn flatten(root: &ChainLink) -> Vec<String> {
    let mut names = Vec::new();
    let mut stack = vec![root];

    while let Some(link) = stack.pop() {
        names.push(link.species.name.clone());
        // Reversed so the first child is popped next
        stack.extend(link.evolves_to.iter().rev());
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedRef;

    fn link(name: &str, children: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: NamedRef {
                name: name.to_string(),
                url: format!("https://x/pokemon-species/{name}/"),
            },
            evolves_to: children,
        }
    }

    #[test]
    fn test_linear_chain() {
        let chain = link(
            "charmander",
            vec![link("charmeleon", vec![link("charizard", vec![])])],
        );
        assert_eq!(flatten(&chain), vec!["charmander", "charmeleon", "charizard"]);
    }

    #[test]
    fn test_branching_chain_keeps_sibling_order() {
        let chain = link(
            "eevee",
            vec![
                link("vaporeon", vec![]),
                link("jolteon", vec![]),
                link("flareon", vec![]),
            ],
        );
        assert_eq!(flatten(&chain), vec!["eevee", "vaporeon", "jolteon", "flareon"]);
    }

    #[test]
    fn test_nested_branches_are_depth_first() {
        // oddish -> gloom -> (vileplume, bellossom)
        let chain = link(
            "oddish",
            vec![link(
                "gloom",
                vec![link("vileplume", vec![]), link("bellossom", vec![])],
            )],
        );
        assert_eq!(
            flatten(&chain),
            vec!["oddish", "gloom", "vileplume", "bellossom"]
        );

        // a -> (b -> c, d): c comes before d
        let chain = link("a", vec![link("b", vec![link("c", vec![])]), link("d", vec![])]);
        assert_eq!(flatten(&chain), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_single_node() {
        assert_eq!(flatten(&link("ditto", vec![])), vec!["ditto"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut chain = link("n0", vec![]);
        for i in 1..50_000 {
            chain = link(&format!("n{i}"), vec![chain]);
        }
        let names = flatten(&chain);
        assert_eq!(names.len(), 50_000);
        assert_eq!(names.first().map(String::as_str), Some("n49999"));
        assert_eq!(names.last().map(String::as_str), Some("n0"));
        // Recursive Drop of the tree would overflow; unwind it by hand
        let mut next = Some(chain);
        while let Some(mut node) = next {
            next = node.evolves_to.pop();
        }
    }
}
