//! 라인 단위 unified diff 생성기.
//! 문맥 줄 없이 변경 구간(hunk)만 담는 최소 형식을 만든다.

/// old/new 본문을 라인 비교해 unified diff 문서를 만든다.
/// 없는 쪽은 빈 본문으로 취급한다(추가 파일은 old가 빈 문자열).
pub fn synthesize(path: &str, old_text: &str, new_text: &str) -> String {
    let old: Vec<&str> = old_text.lines().collect();
    let new: Vec<&str> = new_text.lines().collect();

    let mut patch = String::new();
    patch.push_str(&format!("--- a/{path}\n"));
    patch.push_str(&format!("+++ b/{path}\n"));

    let ops = diff_ops(&old, &new);

    let mut old_idx = 0usize;
    let mut new_idx = 0usize;
    let mut hunk: Option<Hunk<'_>> = None;

    for op in ops {
        match op {
            Op::Equal => {
                if let Some(done) = hunk.take() {
                    done.write(&mut patch);
                }
                old_idx += 1;
                new_idx += 1;
            }
            Op::Delete => {
                hunk.get_or_insert_with(|| Hunk::start(old_idx, new_idx))
                    .deleted
                    .push(old[old_idx]);
                old_idx += 1;
            }
            Op::Insert => {
                hunk.get_or_insert_with(|| Hunk::start(old_idx, new_idx))
                    .inserted
                    .push(new[new_idx]);
                new_idx += 1;
            }
        }
    }

    if let Some(done) = hunk.take() {
        done.write(&mut patch);
    }

    patch
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// 연속된 변경 라인 묶음. 삭제 라인을 먼저, 삽입 라인을 뒤에 적는다.
struct Hunk<'a> {
    old_start: usize,
    new_start: usize,
    deleted: Vec<&'a str>,
    inserted: Vec<&'a str>,
}

impl<'a> Hunk<'a> {
    fn start(old_idx: usize, new_idx: usize) -> Self {
        Self {
            old_start: old_idx,
            new_start: new_idx,
            deleted: Vec::new(),
            inserted: Vec::new(),
        }
    }

    fn write(&self, out: &mut String) {
        let old_count = self.deleted.len();
        let new_count = self.inserted.len();
        // 개수가 0인 쪽은 unified diff 관례대로 직전 라인 번호를 적는다.
        let old_start = if old_count == 0 {
            self.old_start
        } else {
            self.old_start + 1
        };
        let new_start = if new_count == 0 {
            self.new_start
        } else {
            self.new_start + 1
        };

        out.push_str(&format!(
            "@@ -{old_start},{old_count} +{new_start},{new_count} @@\n"
        ));
        for line in &self.deleted {
            out.push_str(&format!("-{line}\n"));
        }
        for line in &self.inserted {
            out.push_str(&format!("+{line}\n"));
        }
    }
}

/// 공통 접두/접미를 잘라낸 뒤 LCS 역추적으로 편집 연산 수열을 구한다.
fn diff_ops(old: &[&str], new: &[&str]) -> Vec<Op> {
    let mut prefix = 0;
    while prefix < old.len() && prefix < new.len() && old[prefix] == new[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < old.len() - prefix
        && suffix < new.len() - prefix
        && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let mid_old = &old[prefix..old.len() - suffix];
    let mid_new = &new[prefix..new.len() - suffix];
    let m = mid_old.len();
    let n = mid_new.len();

    // lcs[i][j] = mid_old[i..]와 mid_new[j..]의 LCS 길이.
    let width = n + 1;
    let mut lcs = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            lcs[i * width + j] = if mid_old[i] == mid_new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(old.len() + new.len());
    ops.extend(std::iter::repeat_n(Op::Equal, prefix));

    let mut i = 0;
    let mut j = 0;
    while i < m && j < n {
        if mid_old[i] == mid_new[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            ops.push(Op::Delete);
            i += 1;
        } else {
            ops.push(Op::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat_n(Op::Delete, m - i));
    ops.extend(std::iter::repeat_n(Op::Insert, n - j));
    ops.extend(std::iter::repeat_n(Op::Equal, suffix));

    ops
}
