//! Property tests for reachability pruning.
//!
//! Random package sets are generated over a fixed universe of declarations
//! `p<i>.T<j>` whose fields reference each other freely (cycles included).
//! The pruned result is compared against a breadth-first search over the
//! same reference graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use proptest::prelude::*;
use protodoc_prune::{SymbolTable, prune_types};
use protodoc_schemas::{Endpoint, Field, Message, Package, Service, Type};

const PACKAGES: usize = 3;
const TYPES: usize = 4;

/// Declaration coordinates: (package index, type index).
type Coord = (usize, usize);

fn full_name((p, t): Coord) -> String {
    format!("p{p}.T{t}")
}

fn arb_coord() -> impl Strategy<Value = Coord> {
    (0..PACKAGES, 0..TYPES)
}

/// How a field wraps its reference.
fn arb_field_type() -> impl Strategy<Value = Type> {
    (arb_coord(), 0..3_u8).prop_map(|(coord, wrap)| {
        let target = Type::reference(full_name(coord));
        match wrap {
            0 => target,
            1 => Type::array(target),
            _ => Type::map(Type::basic("String"), target),
        }
    })
}

/// Field types of every declaration, then endpoint roots per package.
fn arb_universe()
-> impl Strategy<Value = (Vec<Vec<Vec<Type>>>, Vec<Vec<Coord>>)> {
    let fields = proptest::collection::vec(
        proptest::collection::vec(
            proptest::collection::vec(arb_field_type(), 0..3),
            TYPES,
        ),
        PACKAGES,
    );
    let roots = proptest::collection::vec(
        proptest::collection::vec(arb_coord(), 0..3),
        PACKAGES,
    );
    (fields, roots)
}

fn build(fields: &[Vec<Vec<Type>>], roots: &[Vec<Coord>]) -> Vec<Package> {
    (0..PACKAGES)
        .map(|p| {
            let types: BTreeMap<String, Type> = (0..TYPES)
                .map(|t| {
                    let name = format!("T{t}");
                    let message = Message {
                        name: name.clone(),
                        description: String::new(),
                        fields: fields[p][t]
                            .iter()
                            .enumerate()
                            .map(|(i, ty)| Field {
                                name: format!("f{i}"),
                                description: String::new(),
                                ty: ty.clone(),
                            })
                            .collect(),
                    };
                    (name, Type::Message(message))
                })
                .collect();
            let endpoints = roots[p]
                .iter()
                .map(|&coord| Endpoint {
                    name: "Call".to_string(),
                    description: String::new(),
                    method: "POST".to_string(),
                    path: "/call".to_string(),
                    body_field: None,
                    request: Type::reference(full_name(coord)),
                    response: Type::basic("Empty"),
                    streaming_request: false,
                    streaming_response: false,
                })
                .collect();
            Package {
                name: format!("p{p}"),
                id: format!("p{p}"),
                description: String::new(),
                services: vec![Service {
                    name: "Svc".to_string(),
                    description: String::new(),
                    endpoints,
                }],
                types,
            }
        })
        .collect()
}

fn targets(ty: &Type, out: &mut Vec<String>) {
    ty.for_each_ref(&mut |r| out.push(r.name.clone()));
}

/// Breadth-first search over declaration names.
fn expected_reachable(packages: &[Package]) -> BTreeSet<String> {
    let by_name: BTreeMap<String, &Type> = packages
        .iter()
        .flat_map(|p| p.types.iter().map(|(k, v)| (p.qualify(k), v)))
        .collect();

    let mut queue = VecDeque::new();
    for endpoint in packages
        .iter()
        .flat_map(|p| &p.services)
        .flat_map(|s| &s.endpoints)
    {
        let mut roots = Vec::new();
        targets(&endpoint.request, &mut roots);
        targets(&endpoint.response, &mut roots);
        queue.extend(roots);
    }

    let mut seen = BTreeSet::new();
    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let mut next = Vec::new();
        targets(by_name[&name], &mut next);
        queue.extend(next);
    }
    seen
}

fn kept(packages: &[Package]) -> BTreeSet<String> {
    packages
        .iter()
        .flat_map(|p| p.types.keys().map(|k| p.qualify(k)))
        .collect()
}

proptest! {
    /// Exactly the declarations reachable from some endpoint survive.
    #[test]
    fn kept_types_are_exactly_the_reachable_ones(
        (fields, roots) in arb_universe()
    ) {
        let mut packages = build(&fields, &roots);
        let expected = expected_reachable(&packages);

        let used = prune_types(&mut packages).expect("all refs resolve");

        prop_assert_eq!(kept(&packages), expected.clone());
        let used: BTreeSet<String> = used.iter().map(str::to_owned).collect();
        prop_assert_eq!(used, expected);
    }

    /// Pruning is a fixpoint: every kept reference still resolves and a
    /// second pass removes nothing.
    #[test]
    fn pruning_is_idempotent((fields, roots) in arb_universe()) {
        let mut packages = build(&fields, &roots);
        prune_types(&mut packages).expect("first pass");
        let once = packages.clone();

        SymbolTable::build(&packages)
            .check_references()
            .expect("kept refs resolve");
        prune_types(&mut packages).expect("second pass");

        prop_assert_eq!(packages, once);
    }
}
