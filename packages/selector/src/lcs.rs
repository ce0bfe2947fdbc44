/// Longest common subsequence with a pluggable merge predicate
///
/// `select` decides whether two elements count as "common" and, if so, which
/// value represents them in the result. Returning `None` means the pair does
/// not match. The plain-equality version is [`longest_common_subsequence`].
pub fn longest_common_subsequence_by<T: Clone>(
    list1: &[T],
    list2: &[T],
    select: impl Fn(&T, &T) -> Option<T>,
) -> Vec<T> {
    let mut lengths = vec![vec![0usize; list2.len() + 1]; list1.len() + 1];
    let mut selections: Vec<Vec<Option<T>>> = vec![vec![None; list2.len()]; list1.len()];

    for i in 0..list1.len() {
        for j in 0..list2.len() {
            let selection = select(&list1[i], &list2[j]);
            lengths[i + 1][j + 1] = match &selection {
                Some(..) => lengths[i][j] + 1,
                None => lengths[i + 1][j].max(lengths[i][j + 1]),
            };
            selections[i][j] = selection;
        }
    }

    backtrack(
        &selections,
        &lengths,
        list1.len() as isize - 1,
        list2.len() as isize - 1,
    )
}

/// Longest common subsequence under plain equality
pub fn longest_common_subsequence<T: Clone + PartialEq>(list1: &[T], list2: &[T]) -> Vec<T> {
    longest_common_subsequence_by(list1, list2, |element1, element2| {
        if element1 == element2 {
            Some(element1.clone())
        } else {
            None
        }
    })
}

fn backtrack<T: Clone>(
    selections: &[Vec<Option<T>>],
    lengths: &[Vec<usize>],
    i: isize,
    j: isize,
) -> Vec<T> {
    if i == -1 || j == -1 {
        return Vec::new();
    }

    if let Some(selection) = &selections[i as usize][j as usize] {
        let mut result = backtrack(selections, lengths, i - 1, j - 1);
        result.push(selection.clone());
        return result;
    }

    if lengths[(i + 1) as usize][j as usize] > lengths[i as usize][(j + 1) as usize] {
        backtrack(selections, lengths, i, j - 1)
    } else {
        backtrack(selections, lengths, i - 1, j)
    }
}
