/// Cartesian product over a list of alternative groups
///
/// Each result picks exactly one element from each group. If any group is
/// empty the product is empty. Callers treat the output as an unordered set
/// of alternatives, but the traversal order is fixed for determinism.
pub fn permutate<T: Clone>(choices: &[Vec<T>]) -> Vec<Vec<T>> {
    choices.iter().fold(vec![Vec::new()], |paths, choice| {
        choice
            .iter()
            .flat_map(|option| {
                paths.iter().map(move |path| {
                    let mut path = path.clone();
                    path.push(option.clone());
                    path
                })
            })
            .collect()
    })
}

/// Cartesian product with the alternate traversal order
///
/// Produces the same set of tuples as [`permutate`], enumerated with the
/// rightmost group incrementing fastest. Convenient where callers want
/// output grouped by the earlier choices.
pub fn permutate_alt<T: Clone>(choices: &[Vec<T>]) -> Vec<Vec<T>> {
    choices.iter().fold(vec![Vec::new()], |paths, choice| {
        paths
            .iter()
            .flat_map(|path| {
                choice.iter().map(|option| {
                    let mut path = path.clone();
                    path.push(option.clone());
                    path
                })
            })
            .collect()
    })
}
