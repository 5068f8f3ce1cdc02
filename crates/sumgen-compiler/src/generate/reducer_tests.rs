use indoc::indoc;

use super::{GenContext, ReducerGenerator};
use crate::test_utils::{expect_infer, go_decl};

const TREE: &str = indoc! {r#"
    package geo

    //go:tag mkunion:"Tree"
    type (
        Branch struct {
            L, R Tree
        }
        Leaf struct {
            Value int
        }
    )
"#};

fn generate_reducer(src: &str) -> String {
    let info = expect_infer(src);
    let ctx = GenContext::new(&info.pkg_name, &info.pkg_import_name).local_shapes(&info.shapes);
    ReducerGenerator::new(&ctx, &info.unions[0]).generate().body
}

#[test]
fn reducer_interface() {
    let go = generate_reducer(TREE);

    insta::assert_snapshot!(go_decl(&go, "type TreeReducer"), @r"
    type TreeReducer[A any] interface {
        ReduceBranch(x *Branch, agg A) (result A, stop bool)
        ReduceLeaf(x *Leaf, agg A) (result A, stop bool)
    }
    ");
}

#[test]
fn depth_first_visits_children_in_field_order() {
    let go = generate_reducer(TREE);

    insta::assert_snapshot!(go_decl(&go, "func (d *TreeDepthFirstVisitor[A]) VisitBranch"), @r"
    func (d *TreeDepthFirstVisitor[A]) VisitBranch(v *Branch) any {
        d.result, d.stop = d.reduce.ReduceBranch(v, d.result)
        if d.stop {
            return nil
        }
        if child := v.L; child != nil {
            child.AcceptTree(d)
            if d.stop {
                return nil
            }
        }
        if child := v.R; child != nil {
            child.AcceptTree(d)
            if d.stop {
                return nil
            }
        }

        return nil
    }
    ");
    insta::assert_snapshot!(go_decl(&go, "func (d *TreeDepthFirstVisitor[A]) VisitLeaf"), @r"
    func (d *TreeDepthFirstVisitor[A]) VisitLeaf(v *Leaf) any {
        d.result, d.stop = d.reduce.ReduceLeaf(v, d.result)

        return nil
    }
    ");
    insta::assert_snapshot!(go_decl(&go, "func ReduceTreeDepthFirst"), @r"
    func ReduceTreeDepthFirst[A any](r TreeReducer[A], v Tree, init A) A {
        if v == nil {
            return init
        }

        reducer := &TreeDepthFirstVisitor[A]{
            result: init,
            reduce: r,
        }

        _ = v.AcceptTree(reducer)

        return reducer.result
    }
    ");
}

#[test]
fn breadth_first_queues_children_before_reducing() {
    let go = generate_reducer(TREE);

    insta::assert_snapshot!(go_decl(&go, "func (d *TreeBreadthFirstVisitor[A]) VisitBranch"), @r"
    func (d *TreeBreadthFirstVisitor[A]) VisitBranch(v *Branch) any {
        if child := v.L; child != nil {
            d.queue = append(d.queue, child)
        }
        if child := v.R; child != nil {
            d.queue = append(d.queue, child)
        }

        d.result, d.stop = d.reduce.ReduceBranch(v, d.result)
        return nil
    }
    ");
    insta::assert_snapshot!(go_decl(&go, "func (d *TreeBreadthFirstVisitor[A]) execute"), @r"
    func (d *TreeBreadthFirstVisitor[A]) execute() {
        for len(d.queue) > 0 && !d.stop {
            node := d.pop()
            if d.visited[node] {
                continue
            }
            d.visited[node] = true
            node.AcceptTree(d)
        }
    }
    ");
    insta::assert_snapshot!(go_decl(&go, "func ReduceTreeBreadthFirst"), @r"
    func ReduceTreeBreadthFirst[A any](r TreeReducer[A], v Tree, init A) A {
        if v == nil {
            return init
        }

        reducer := &TreeBreadthFirstVisitor[A]{
            result:  init,
            reduce:  r,
            queue:   []Tree{v},
            visited: make(map[Tree]bool),
        }

        reducer.execute()

        return reducer.result
    }
    ");
}

#[test]
fn collections_of_children() {
    let go = generate_reducer(indoc! {r#"
        package geo

        //go:tag mkunion:"Node"
        type (
            Block struct {
                Items []Node
                Named map[string]*Node
            }
            Empty struct{}
        )
    "#});

    insta::assert_snapshot!(go_decl(&go, "func (d *NodeDepthFirstVisitor[A]) VisitBlock"), @r"
    func (d *NodeDepthFirstVisitor[A]) VisitBlock(v *Block) any {
        d.result, d.stop = d.reduce.ReduceBlock(v, d.result)
        if d.stop {
            return nil
        }
        for _, child := range v.Items {
            if child == nil {
                continue
            }
            child.AcceptNode(d)
            if d.stop {
                return nil
            }
        }
        for _, ptr := range v.Named {
            if ptr == nil || *ptr == nil {
                continue
            }
            child := *ptr
            child.AcceptNode(d)
            if d.stop {
                return nil
            }
        }

        return nil
    }
    ");
}

#[test]
fn default_reduction() {
    let go = generate_reducer(TREE);

    insta::assert_snapshot!(go_decl(&go, "type TreeDefaultReduction"), @r"
    type TreeDefaultReduction[A any] struct {
        PanicOnFallback      bool
        DefaultStopReduction bool
        OnBranch             func(x *Branch, agg A) (A, bool)
        OnLeaf               func(x *Leaf, agg A) (A, bool)
    }
    ");
    insta::assert_snapshot!(go_decl(&go, "func (t *TreeDefaultReduction[A]) ReduceLeaf"), @r#"
    func (t *TreeDefaultReduction[A]) ReduceLeaf(x *Leaf, agg A) (A, bool) {
        if t.OnLeaf != nil {
            return t.OnLeaf(x, agg)
        }
        if t.PanicOnFallback {
            panic("no fallback allowed on undefined ReduceLeaf")
        }
        return agg, t.DefaultStopReduction
    }
    "#);
    assert!(go.contains("var _ TreeReducer[any] = (*TreeDefaultReduction[any])(nil)\n"));
}

#[test]
fn generic_union_gets_fresh_accumulator() {
    let go = generate_reducer(indoc! {r#"
        package geo

        //go:tag mkunion:"List[A]"
        type (
            Cons[A any] struct {
                Head A
                Tail List[A]
            }
            Nil[A any] struct{}
        )
    "#});

    assert!(go.contains("type ListReducer[A any, A1 any] interface {\n"));
    assert!(go.contains("\tReduceCons(x *Cons[A], agg A1) (result A1, stop bool)\n"));
    assert!(go.contains(
        "func ReduceListDepthFirst[A any, A1 any](r ListReducer[A, A1], v List[A], init A1) A1 {\n"
    ));
    assert!(go.contains("\tif child := v.Tail; child != nil {\n"));
    assert!(!go.contains("var _ ListVisitor"));
}
