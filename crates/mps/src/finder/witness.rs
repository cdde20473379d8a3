//! Independent planarity check for tests (Boyer–Myrvold edge addition, O(n)).
//!
//! Shares no code with the elimination engine: its own DFS, its own cyclic
//! lists, its own embedding rules. Used to certify that tree edges plus kept
//! back edges form a planar graph.
//!
//! References
//! - J. Boyer and W. Myrvold, "On the Cutting Edge: Simplified O(n) Planarity
//!   by Edge Addition", 2004.

const UNSET: u32 = u32::MAX;
const INF: u32 = u32::MAX;

/// Forward-star adjacency: edges of `u` are `link[head[u]..head[u + 1]]`.
struct Csr {
    head: Vec<u32>,
    link: Vec<u32>,
}

impl Csr {
    fn from_pairs(n: usize, pairs: &[(u32, u32)]) -> Self {
        let mut head = vec![0u32; n + 1];
        for &(u, _) in pairs {
            head[u as usize] += 1;
        }
        for i in 0..n {
            head[i + 1] += head[i];
        }
        let mut link = vec![0u32; pairs.len()];
        for &(u, v) in pairs {
            head[u as usize] -= 1;
            link[head[u as usize] as usize] = v;
        }
        Self { head, link }
    }

    fn len(&self) -> usize {
        self.head.len() - 1
    }

    fn edge_range(&self, u: usize) -> std::ops::Range<usize> {
        self.head[u] as usize..self.head[u + 1] as usize
    }
}

/// Sort `0..n` by a key in `0..key_bound` (stable).
fn bucket_sort_iota(n: u32, key_bound: u32, key: impl Fn(u32) -> u32) -> Vec<u32> {
    let mut head = vec![UNSET; key_bound as usize];
    let mut link = vec![UNSET; n as usize];
    for x in (0..n).rev() {
        let k = key(x);
        link[x as usize] = head[k as usize];
        head[k as usize] = x;
    }
    let mut out = Vec::with_capacity(n as usize);
    for &h in &head {
        let mut x = h;
        while x != UNSET {
            out.push(x);
            x = link[x as usize];
        }
    }
    out
}

/// Directed cyclic lists over a fixed node pool.
struct CyclicLists {
    links: Vec<[u32; 2]>,
}

impl CyclicLists {
    fn with_size(n: usize) -> Self {
        Self {
            links: (0..n as u32).map(|u| [u, u]).collect(),
        }
    }

    fn is_isolated(&self, u: u32) -> bool {
        self.links[u as usize][0] == u
    }

    fn next(&self, u: u32) -> u32 {
        self.links[u as usize][1]
    }

    fn isolate(&mut self, u: u32) {
        let [a, b] = self.links[u as usize];
        if a == u {
            return;
        }
        self.links[a as usize][1] = b;
        self.links[b as usize][0] = a;
        self.links[u as usize] = [u, u];
    }

    fn insert_left(&mut self, pivot: u32, u: u32) {
        let [a, _] = self.links[pivot as usize];
        self.links[a as usize][1] = u;
        self.links[u as usize] = [a, pivot];
        self.links[pivot as usize][0] = u;
    }

    fn insert_right(&mut self, pivot: u32, u: u32) {
        let [_, a] = self.links[pivot as usize];
        self.links[pivot as usize][1] = u;
        self.links[u as usize] = [pivot, a];
        self.links[a as usize][0] = u;
    }

    fn pop_right(&mut self, u: u32) -> Option<u32> {
        let v = self.links[u as usize][1];
        if u == v {
            return None;
        }
        self.isolate(v);
        Some(v)
    }
}

/// Cyclic lists whose two link slots carry no direction.
struct UndirectedLists {
    links: Vec<[u32; 2]>,
}

impl UndirectedLists {
    fn with_size(n: usize) -> Self {
        Self {
            links: (0..n as u32).map(|u| [u, u]).collect(),
        }
    }

    fn xor(&self, u: u32) -> u32 {
        let [a, b] = self.links[u as usize];
        a ^ b
    }

    fn links(&self, u: u32) -> [u32; 2] {
        self.links[u as usize]
    }

    fn update_link(&mut self, u: u32, old: u32, new: u32) {
        let b = (self.links[u as usize][1] == old) as usize;
        self.links[u as usize][b] = new;
    }

    fn isolate(&mut self, u: u32) {
        let [x, y] = self.links[u as usize];
        if x == u {
            return;
        }
        self.update_link(x, u, y);
        self.update_link(y, u, x);
        self.links[u as usize] = [u, u];
    }

    fn step(&self, u: &mut u32, prev: &mut u32) {
        *u = self.xor(*u) ^ std::mem::replace(prev, *u);
    }

    fn insert_slice_between(&mut self, pu: u32, u: u32, v: u32, nv: u32) {
        self.update_link(pu, nv, u);
        self.update_link(u, v, pu);
        self.update_link(v, u, nv);
        self.update_link(nv, pu, v);
    }

    fn insert_between(&mut self, u: u32, v: u32, a: u32) {
        self.update_link(u, v, a);
        self.update_link(v, u, a);
        self.links[a as usize] = [u, v];
    }

    fn insert_any_side(&mut self, pivot: u32, u: u32) {
        let side = self.links[pivot as usize][0];
        self.insert_between(pivot, side, u);
    }

    fn split_slice_out(&mut self, pu: u32, u: u32, v: u32, nv: u32) {
        self.update_link(pu, u, nv);
        self.update_link(u, pu, v);
        self.update_link(v, nv, u);
        self.update_link(nv, v, pu);
    }

    fn find1(&self, entry: u32, next: u32, mut pred: impl FnMut(u32) -> bool) -> Option<(u32, u32)> {
        let mut prev = entry;
        let mut c = next;
        while c != entry {
            if pred(c) {
                return Some((c, prev));
            }
            self.step(&mut c, &mut prev);
        }
        None
    }

    fn bidirectional_search<T>(&self, entry: u32, mut visitor: impl FnMut(u32) -> Result<(), T>) -> T {
        let mut prev = self.links[entry as usize];
        let mut c = [entry; 2];
        loop {
            if let Err(e) = visitor(c[0]) {
                return e;
            }
            self.step(&mut c[0], &mut prev[0]);
            self.step(&mut c[1], &mut prev[1]);
            if let Err(e) = visitor(c[1]) {
                return e;
            }
        }
    }
}

struct DfsForest {
    parent: Vec<u32>,
    parent_edge: Vec<u32>,
    t_in: Vec<u32>,
    tour: Vec<u32>,
    /// Lowest entry time reachable from the subtree through one back edge.
    low: Vec<u32>,
    /// Lowest entry time reachable directly through a back edge.
    least_ancestor: Vec<u32>,
    order_by_low: Vec<u32>,
}

impl DfsForest {
    fn new(neighbors: &Csr) -> Self {
        let n = neighbors.len();
        let mut parent: Vec<u32> = (0..n as u32).collect();
        let mut parent_edge = vec![UNSET; n];
        let mut t_in = vec![UNSET; n];
        let mut tour = Vec::with_capacity(n);
        let mut low = vec![UNSET; n];
        let mut least_ancestor = vec![INF; n];

        let mut current_edge = neighbors.head[..n].to_vec();
        let mut timer = 0u32;
        for root in 0..n as u32 {
            if t_in[root as usize] != UNSET {
                continue;
            }
            parent[root as usize] = root;
            least_ancestor[root as usize] = timer;

            let mut u = root;
            loop {
                let p = parent[u as usize];
                let e = current_edge[u as usize];
                current_edge[u as usize] += 1;
                if e == neighbors.head[u as usize] {
                    t_in[u as usize] = timer;
                    low[u as usize] = timer;
                    tour.push(u);
                    timer += 1;
                }
                if e == neighbors.head[u as usize + 1] {
                    if p == u {
                        break;
                    }
                    low[p as usize] = low[p as usize].min(low[u as usize]);
                    u = p;
                    continue;
                }

                let v = neighbors.link[e as usize];
                if v == p {
                    continue;
                }
                if t_in[v as usize] == UNSET {
                    parent[v as usize] = u;
                    parent_edge[v as usize] = e;
                    least_ancestor[v as usize] = t_in[u as usize];
                    u = v;
                } else if t_in[v as usize] < t_in[u as usize] {
                    low[u as usize] = low[u as usize].min(t_in[v as usize]);
                    least_ancestor[u as usize] = least_ancestor[u as usize].min(t_in[v as usize]);
                }
            }
        }

        let order_by_low = bucket_sort_iota(n as u32, n as u32, |u| low[u as usize]);
        Self {
            parent,
            parent_edge,
            t_in,
            tour,
            low,
            least_ancestor,
            order_by_low,
        }
    }
}

struct BoyerMyrvold {
    neighbors: Csr,
    dfs: DfsForest,
    /// Separated DFS children per vertex; vertex `w` lives at `n + w`.
    sep_children: CyclicLists,
    /// External faces of the partial embedding; bicomp root of child `c` is
    /// `n + c`.
    boundary: UndirectedLists,
    /// Pertinent bicomp roots per vertex, same indexing as `boundary`.
    pertinent_roots: CyclicLists,
    visited_from: Vec<u32>,
    back_edge_flag: Vec<u32>,
    merge_stack: Vec<(u32, u32, u32)>,
}

impl BoyerMyrvold {
    fn new(neighbors: Csr) -> Self {
        let n = neighbors.len();
        let dfs = DfsForest::new(&neighbors);
        let mut this = Self {
            neighbors,
            dfs,
            sep_children: CyclicLists::with_size(n + n),
            boundary: UndirectedLists::with_size(n + n),
            pertinent_roots: CyclicLists::with_size(n + n),
            visited_from: vec![UNSET; n + n],
            back_edge_flag: vec![UNSET; n],
            merge_stack: Vec::new(),
        };
        for i in 0..n {
            let u = this.dfs.order_by_low[i];
            let p = this.dfs.parent[u as usize];
            if u == p {
                continue;
            }
            this.sep_children.insert_left(n as u32 + p, u);
            this.boundary.insert_any_side(n as u32 + u, u);
        }
        this
    }

    fn n_verts(&self) -> usize {
        self.neighbors.len()
    }

    fn is_pertinent(&self, u: u32, w: u32) -> bool {
        self.back_edge_flag[w as usize] == u || !self.pertinent_roots.is_isolated(w)
    }

    fn is_externally_active(&self, u: u32, w: u32) -> bool {
        let n = self.n_verts() as u32;
        self.dfs.least_ancestor[w as usize] < self.dfs.t_in[u as usize]
            || !self.sep_children.is_isolated(n + w) && {
                let c0 = self.sep_children.next(n + w);
                self.dfs.low[c0 as usize] < self.dfs.t_in[u as usize]
            }
    }

    fn is_internally_active(&self, u: u32, w: u32) -> bool {
        self.is_pertinent(u, w) && !self.is_externally_active(u, w)
    }

    fn is_active(&self, u: u32, w: u32) -> bool {
        self.is_pertinent(u, w) || self.is_externally_active(u, w)
    }

    fn walk_up(&mut self, u: u32, mut w: u32) {
        let n = self.n_verts() as u32;
        self.back_edge_flag[w as usize] = u;
        loop {
            let visited_from = &mut self.visited_from;
            let found = self.boundary.bidirectional_search(w, |g| {
                if visited_from[g as usize] == u {
                    return Err(None);
                }
                visited_from[g as usize] = u;
                if g >= n {
                    Err(Some(g))
                } else {
                    Ok(())
                }
            });
            let Some(bcc_root) = found else {
                return;
            };

            let c = bcc_root - n;
            let r = self.dfs.parent[c as usize];
            // Roots externally active relative to `u` go last.
            if self.dfs.low[c as usize].min(self.dfs.least_ancestor[c as usize]) < self.dfs.t_in[u as usize] {
                self.pertinent_roots.insert_left(r, bcc_root);
            } else {
                self.pertinent_roots.insert_right(r, bcc_root);
            }

            if r == u || self.visited_from[r as usize] == u {
                break;
            }
            w = r;
        }
    }

    fn walk_down(&mut self, u: u32, bcc_root: u32) -> bool {
        let n = self.n_verts() as u32;
        self.merge_stack.clear();
        let mut a = bcc_root;
        loop {
            let [la, ra] = self.boundary.links(a);
            let Some((x, px)) = self.boundary.find1(a, la, |w| self.is_active(u, w)) else {
                break;
            };
            let Some((y, py)) = self.boundary.find1(a, ra, |w| self.is_active(u, w)) else {
                break;
            };

            let z = if self.is_internally_active(u, x) {
                x
            } else if self.is_internally_active(u, y) {
                y
            } else if self.is_pertinent(u, x) {
                x
            } else if self.is_pertinent(u, y) {
                y
            } else {
                if !self.merge_stack.is_empty() {
                    // A pertinent child bicomp blocked on both sides.
                    return false;
                }
                if x != y {
                    // A pertinent vertex strictly between x and y would be
                    // cut off by the external paths through x and y.
                    let (mut c, mut pc) = (x, px);
                    loop {
                        self.boundary.step(&mut c, &mut pc);
                        if c == y || self.visited_from[c as usize] != u {
                            break;
                        }
                        if self.is_pertinent(u, c) {
                            return false;
                        }
                    }
                    if c != y {
                        let (mut d, mut pd) = (y, py);
                        loop {
                            self.boundary.step(&mut d, &mut pd);
                            if self.visited_from[d as usize] != u {
                                break;
                            }
                            if self.is_pertinent(u, d) {
                                return false;
                            }
                        }
                    }
                }
                // Short-circuit edge.
                self.boundary.split_slice_out(px, x, y, py);
                self.boundary.isolate(bcc_root);
                self.boundary.insert_between(x, y, bcc_root);
                break;
            };

            let mut pz = if z == x { px } else { py };
            let mut fz = if z == x { ra } else { la };
            if self.back_edge_flag[z as usize] != u {
                assert!(!self.pertinent_roots.is_isolated(z));
                self.merge_stack.push((z, pz, fz));
                a = self.pertinent_roots.next(z);
                continue;
            }

            // Back edge found: merge the bicomps on the root path.
            self.back_edge_flag[z as usize] = UNSET;
            while let Some((s, ps, fs)) = self.merge_stack.pop() {
                a = self
                    .pertinent_roots
                    .pop_right(s)
                    .expect("merge stack entries have a pertinent root");
                let c = a - n;
                self.sep_children.isolate(c);
                self.boundary.split_slice_out(pz, z, fz, a);
                self.boundary.insert_slice_between(ps, z, fz, s);
                pz = ps;
                fz = fs;
            }

            a = bcc_root;
            let ez = self.boundary.xor(bcc_root) ^ fz;
            self.boundary.split_slice_out(pz, z, bcc_root, ez);
        }
        true
    }

    /// Descendants `w` joined to `u` by a back edge.
    fn back_edges_below(&self, u: u32) -> impl Iterator<Item = u32> + '_ {
        self.neighbors.edge_range(u as usize).filter_map(move |e| {
            let w = self.neighbors.link[e];
            (self.dfs.t_in[u as usize] < self.dfs.t_in[w as usize]
                && self.dfs.parent_edge[w as usize] != e as u32)
                .then_some(w)
        })
    }

    fn run(&mut self) -> bool {
        for t in (0..self.n_verts()).rev() {
            let u = self.dfs.tour[t];
            let below: Vec<u32> = self.back_edges_below(u).collect();
            for w in below {
                self.walk_up(u, w);
            }
            while let Some(r) = self.pertinent_roots.pop_right(u) {
                if !self.walk_down(u, r) {
                    return false;
                }
            }
            // Embedding clears the flag; a back edge still flagged was cut off.
            if self.back_edges_below(u).any(|w| self.back_edge_flag[w as usize] == u) {
                return false;
            }
        }
        true
    }
}

/// Planarity of a simple graph on `0..n`.
pub(super) fn is_planar(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> bool {
    let pairs: Vec<(u32, u32)> = edges
        .into_iter()
        .filter(|&(u, v)| u != v)
        .flat_map(|(u, v)| [(u as u32, v as u32), (v as u32, u as u32)])
        .collect();
    BoyerMyrvold::new(Csr::from_pairs(n, &pairs)).run()
}

#[test]
fn witness_separates_kuratowski_graphs() {
    let k = |n: usize| (0..n).flat_map(move |u| (u + 1..n).map(move |v| (u, v)));
    assert!(is_planar(4, k(4)));
    assert!(!is_planar(5, k(5)));
    assert!(is_planar(5, k(5).skip(1)));
    let k33: Vec<(usize, usize)> = (0..3).flat_map(|a| (3..6).map(move |b| (a, b))).collect();
    assert!(!is_planar(6, k33.iter().copied()));
    assert!(is_planar(6, k33.iter().copied().skip(1)));
    assert!(is_planar(0, std::iter::empty()));
}

#[test]
fn witness_accepts_planar_graphs_in_any_edge_order() {
    let planar_six = [(5, 3), (1, 5), (4, 3), (1, 4), (0, 1), (5, 0), (2, 5), (2, 0), (4, 2)];
    for shift in 0..planar_six.len() {
        let mut edges = planar_six.to_vec();
        edges.rotate_left(shift);
        assert!(is_planar(6, edges.iter().copied()), "shift {shift}");
        edges.reverse();
        assert!(is_planar(6, edges.iter().copied()), "reversed shift {shift}");
    }
    // Internally active bicomp has to be walked before the external one.
    let nested = [(0, 4), (3, 5), (3, 4), (2, 5), (2, 1), (1, 0), (2, 0), (4, 2), (3, 1)];
    assert!(is_planar(6, nested));
}

#[test]
fn witness_rejects_a_blocked_back_edge() {
    // Contains a subdivided K3,3; the pertinent vertex 7 ends up behind two
    // externally active vertices once the child bicomps are merged.
    let edges = [
        (7, 9), (1, 2), (0, 7), (2, 3), (1, 7), (5, 9), (0, 3), (4, 9),
        (5, 8), (1, 5), (4, 3), (6, 8), (0, 5), (6, 7), (0, 9), (1, 4),
    ];
    assert!(!is_planar(10, edges));
}
