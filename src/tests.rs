use crate::*;

fn carbon(x: f64) -> Atom {
    Atom::new(Element::C, [x, 0.0])
}

#[test]
fn mol_add_atoms_and_bonds() {
    let mut mol = Mol::<Atom, Bond>::new();
    let c = mol.add_atom(carbon(0.0));
    let o = mol.add_atom(Atom::new(Element::O, [1.2, 0.0]));
    let bond_idx = mol.add_bond(c, o, Bond::new(BondOrder::Double));

    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
    assert_eq!(mol.atom(c).element.symbol(), "C");
    assert_eq!(mol.atom(o).element.symbol(), "O");
    assert_eq!(mol.bond(bond_idx).order, BondOrder::Double);
}

#[test]
fn mol_neighbors_and_bonds_of() {
    let mut mol = Mol::<Atom, Bond>::new();
    let a = mol.add_atom(Atom::default());
    let b = mol.add_atom(Atom::default());
    let c = mol.add_atom(Atom::default());
    mol.add_bond(a, b, Bond::default());
    mol.add_bond(a, c, Bond::default());

    assert_eq!(mol.neighbors(a).count(), 2);
    assert_eq!(mol.bonds_of(a).count(), 2);
}

#[test]
fn mol_bond_endpoints_keep_start_and_end() {
    let mut mol = Mol::<Atom, Bond>::new();
    let a = mol.add_atom(Atom::default());
    let b = mol.add_atom(Atom::default());
    let c = mol.add_atom(Atom::default());
    let e = mol.add_bond(b, a, Bond::default());

    assert_eq!(mol.bond_between(a, b), Some(e));
    assert_eq!(mol.bond_between(a, c), None);
    assert_eq!(mol.bond_endpoints(e), Some((b, a)));
}

#[test]
fn mol_equality_compares_contents() {
    let mut left = Mol::<Atom, Bond>::new();
    let a = left.add_atom(carbon(0.0));
    let b = left.add_atom(carbon(1.5));
    left.add_bond(a, b, Bond::default());
    let mut right = left.clone();
    assert_eq!(left, right);

    let idx = right.atoms().next().unwrap();
    right.atom_mut(idx).formal_charge = Some(1);
    assert_ne!(left, right);
}

#[test]
fn trait_impls() {
    let atom = carbon(3.0).with_charge(-1);
    assert_eq!(HasFormalCharge::formal_charge(&atom), -1);
    assert_eq!(HasPosition2D::position_2d(&atom), [3.0, 0.0]);

    let bond = Bond::new(BondOrder::Triple);
    assert_eq!(HasBondOrder::bond_order(&bond), BondOrder::Triple);
}

#[test]
fn defaults() {
    assert_eq!(BondOrder::default(), BondOrder::Single);
    assert_eq!(BondStereo::default(), BondStereo::None);
    let atom = Atom::default();
    assert!(atom.is_carbon());
    assert_eq!(atom.formal_charge, None);
    assert_eq!(atom.isotope, None);
}

/// Ethanol plus a sodium chloride pair, built by hand.
fn sample_model() -> Model {
    let mut ethanol = Molecule::new().with_id("ethanol");
    let c1 = ethanol.add_atom(carbon(0.0));
    let c2 = ethanol.add_atom(carbon(1.54));
    let o = ethanol.add_atom(Atom::new(Element::O, [2.31, 1.33]));
    ethanol.add_bond(c1, c2, Bond::default());
    ethanol.add_bond(c2, o, Bond::default());
    ethanol.add_name(TextualProperty::new("common:Name", "ethanol"));

    let mut salt = Molecule::new().with_id("salt");
    let mut na = Molecule::new();
    na.add_atom(Atom::new(Element::Na, [5.0, 0.0]).with_charge(1));
    let mut cl = Molecule::new();
    cl.add_atom(Atom::new(Element::Cl, [7.0, 0.0]).with_charge(-1));
    salt.add_child(na);
    salt.add_child(cl);

    let mut model = Model::new();
    model.add_molecule(ethanol);
    model.add_molecule(salt);
    model.relabel(Relabel::EnsureUnique);
    model.refresh();
    model
}

#[test]
fn model_counts_cover_every_depth() {
    let model = sample_model();
    assert_eq!(model.molecule_count(), 2);
    assert_eq!(model.total_molecule_count(), 4);
    assert_eq!(model.total_atom_count(), 5);
    assert_eq!(model.total_bond_count(), 2);
    assert_eq!(model.total_name_count(), 1);
    assert_eq!(model.total_ring_count(), 0);
}

#[test]
fn calculated_formulas() {
    let model = sample_model();
    let ethanol = model.molecule("ethanol").unwrap();
    assert_eq!(ethanol.concise_formula(), "C 2 H 6 O 1");
    assert_eq!(ethanol.unicode_formula(), "C₂H₆O");
    let salt = model.molecule("salt").unwrap();
    assert_eq!(salt.concise_formula(), "Cl 1 Na 1");
    assert_eq!(model.concise_formula(), "C 2 H 6 O 1 . Cl 1 Na 1");
}

#[test]
fn fresh_relabel_is_idempotent() {
    let mut model = sample_model();
    model.relabel(Relabel::Fresh);
    let once = model.clone();
    model.relabel(Relabel::Fresh);
    assert_eq!(model, once);
    let ids: Vec<_> = model.all_molecules().map(|m| m.id.clone()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3", "m4"]);
}

#[test]
fn ensure_unique_keeps_unique_ids() {
    let mut model = sample_model();
    let before = model.clone();
    model.relabel(Relabel::EnsureUnique);
    assert_eq!(model, before);
}

#[test]
fn every_format_keeps_atom_counts() {
    let model = sample_model();
    let cml = CmlConverter::new();
    let json = JsonConverter::new();
    let sdf = SdFileConverter::new().unwrap();

    let via_cml = cml.import(&cml.export(&model).unwrap()).unwrap();
    assert_eq!(via_cml.total_molecule_count(), 4);
    assert_eq!(via_cml.total_atom_count(), 5);

    let via_json = json.import(&json.export(&model).unwrap()).unwrap();
    assert_eq!(via_json.molecule_count(), 2);
    assert_eq!(via_json.total_atom_count(), 5);

    let via_sdf = sdf.import(&sdf.export(&model).unwrap()).unwrap();
    assert_eq!(via_sdf.total_atom_count(), 5);
    assert_eq!(via_sdf.total_bond_count(), 2);
}
