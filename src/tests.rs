#[cfg(test)]
mod tests {
    use unordered_pair::UnorderedPair;

    use crate::builder::{BuilderInvalidReason, NetworkBuilder};
    use crate::interceptor::{InterceptError, Interceptor, TurnState};
    use crate::network::{LookupError, Network};
    use crate::node::NodeId;
    use crate::planner::{Planner, PlannerFailure, SearchStats, Threat};
    use crate::protocol::{format_cut, play, read_level, Level, LineReader, ProtocolError};

    fn network(node_count: usize, links: &[(usize, usize)], exits: &[usize]) -> Network {
        let mut builder = NetworkBuilder::with_nodes(node_count);
        for (a, b) in links {
            builder.add_link(NodeId(*a), NodeId(*b));
        }
        for exit in exits {
            builder.add_exit(NodeId(*exit));
        }

        builder.build().unwrap()
    }

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().map(|index| NodeId(*index)).collect()
    }

    #[test]
    fn links_are_symmetric() {
        let mut network = Network::with_nodes(3);
        network.add_edge(NodeId(0), NodeId(1));

        assert_eq!(network.neighbors(NodeId(0)).unwrap(), ids(&[1]));
        assert_eq!(network.neighbors(NodeId(1)).unwrap(), ids(&[0]));
        assert!(network.contains_edge(NodeId(1), NodeId(0)));

        network.remove_edge(NodeId(1), NodeId(0));
        assert!(network.neighbors(NodeId(0)).unwrap().is_empty());
        assert!(network.neighbors(NodeId(1)).unwrap().is_empty());
    }

    #[test]
    fn add_edge_registers_missing_nodes() {
        let mut network = Network::with_nodes(0);
        network.add_edge(NodeId(3), NodeId(7));

        assert_eq!(network.node_count(), 2);
        assert_eq!(network.neighbors(NodeId(7)).unwrap(), ids(&[3]));
    }

    #[test]
    fn removal_is_idempotent() {
        let mut network = network(4, &[(0, 1), (1, 2), (2, 3)], &[3]);

        assert!(network.remove_edge(NodeId(1), NodeId(2)));
        let once = (network.edges(), network.neighbors(NodeId(1)).unwrap(), network.neighbors(NodeId(2)).unwrap());

        assert!(!network.remove_edge(NodeId(1), NodeId(2)));
        assert!(!network.remove_edge(NodeId(2), NodeId(1)));
        let twice = (network.edges(), network.neighbors(NodeId(1)).unwrap(), network.neighbors(NodeId(2)).unwrap());

        assert_eq!(once, twice);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn remove_absent_edge_from_empty_network() {
        let mut network = Network::with_nodes(0);

        assert!(!network.remove_edge(NodeId(9), NodeId(10)));
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn neighbors_of_unknown_node() {
        let network = Network::with_nodes(2);

        assert_eq!(network.neighbors(NodeId(5)), Err(LookupError::UnknownNode(NodeId(5))));
        assert_eq!(network.adjacent_exits(NodeId(5)), Err(LookupError::UnknownNode(NodeId(5))));

        let mut network = network;
        network.add_node(NodeId(5));
        assert_eq!(network.neighbors(NodeId(5)), Ok(vec![]));
    }

    #[test]
    fn adjacent_exits_follow_adjacency_order() {
        let network = network(5, &[(0, 4), (0, 1), (0, 2), (0, 3)], &[3, 4]);

        assert!(network.is_exit(NodeId(4)));
        assert!(!network.is_exit(NodeId(0)));
        assert_eq!(network.adjacent_exits(NodeId(0)).unwrap(), ids(&[4, 3]));
        assert_eq!(network.exits(), ids(&[3, 4]));
    }

    #[test]
    fn builder_rejects_bad_links() {
        let mut builder = NetworkBuilder::with_nodes(3);
        builder.add_link(NodeId(0), NodeId(3));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::NodeOutOfBounds(NodeId(3))]));

        let mut builder = NetworkBuilder::with_nodes(3);
        builder.add_link(NodeId(1), NodeId(1));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::SelfLink(NodeId(1))]);

        let mut builder = NetworkBuilder::with_nodes(3);
        builder.add_link(NodeId(0), NodeId(1))
            .add_link(NodeId(1), NodeId(0))
            // ignored, the builder is already invalid
            .add_link(NodeId(0), NodeId(9));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::DuplicateLink(NodeId(1), NodeId(0))]);
    }

    #[test]
    fn builder_rejects_bad_exits() {
        let mut builder = NetworkBuilder::with_nodes(2);
        builder.add_exit(NodeId(2));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::ExitOutOfBounds(NodeId(2))]);

        let mut builder = NetworkBuilder::with_nodes(2);
        builder.add_exit(NodeId(1)).add_exit(NodeId(1));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::DuplicateExit(NodeId(1))]);
    }

    #[test]
    fn builder_rejects_overloaded_node() {
        let mut builder = NetworkBuilder::with_nodes(5);
        builder.add_link(NodeId(0), NodeId(1))
            .add_link(NodeId(0), NodeId(2))
            .add_link(NodeId(0), NodeId(3))
            .add_link(NodeId(0), NodeId(4))
            .add_exit(NodeId(1))
            .add_exit(NodeId(2))
            .add_exit(NodeId(3));
        assert!(builder.is_valid().is_none());
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::OverloadedNode(NodeId(0))]);
    }

    #[test]
    fn builder_remove_link() {
        let network = NetworkBuilder::with_nodes(3)
            .add_link(NodeId(0), NodeId(1))
            .add_link(NodeId(1), NodeId(2))
            .remove_link(NodeId(1), NodeId(0))
            .add_link(NodeId(0), NodeId(1))
            .build()
            .unwrap();

        assert_eq!(network.edge_count(), 2);
        // re-added last, so it comes last
        assert_eq!(network.neighbors(NodeId(1)).unwrap(), ids(&[2, 0]));
    }

    #[test]
    fn single_exit_on_a_line() {
        // 0 - 1 - 2 - (3)
        let mut interceptor = Interceptor::from(network(4, &[(0, 1), (1, 2), (2, 3)], &[3]));

        let report = interceptor.turn(NodeId(0)).unwrap();
        assert_eq!(report.threat, Threat::Single { node: NodeId(2), exit: NodeId(3) });
        assert_eq!(format_cut(&report.cut), "2 3");
        assert_eq!(report.state, TurnState::Running);
        assert!(!interceptor.network().contains_edge(NodeId(2), NodeId(3)));
    }

    #[test]
    fn fork_then_immediacy() {
        // 4 - 5 - (6)
        //      \- (7)
        let mut interceptor = Interceptor::from(network(8, &[(4, 5), (5, 6), (5, 7)], &[6, 7]));

        let first = interceptor.turn(NodeId(4)).unwrap();
        assert_eq!(first.threat, Threat::Fork { node: NodeId(5), exits: (NodeId(6), NodeId(7)) });
        assert_eq!(format_cut(&first.cut), "5 6");
        assert_eq!(first.state, TurnState::Running);

        let second = interceptor.turn(NodeId(5)).unwrap();
        assert_eq!(second.threat, Threat::Immediate { node: NodeId(5), exit: NodeId(7) });
        assert_eq!(format_cut(&second.cut), "5 7");
        assert_eq!(second.state, TurnState::Stopped);
        assert_eq!(second.turn, 2);

        assert_eq!(interceptor.turn(NodeId(5)), Err(InterceptError::Stopped));
        assert_eq!(interceptor.turns(), 2);
    }

    #[test]
    fn immediacy_beats_fork() {
        // (1) - 0 - 2 - (3)
        //            \- (4)
        let network = network(5, &[(0, 1), (0, 2), (2, 3), (2, 4)], &[1, 3, 4]);

        let (threat, stats) = Planner::from(&network).plan(NodeId(0)).unwrap();
        assert_eq!(threat, Threat::Immediate { node: NodeId(0), exit: NodeId(1) });
        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn double_gate_cuts_only_one() {
        // (1) - 0 - (2)
        let mut interceptor = Interceptor::from(network(3, &[(0, 1), (0, 2)], &[1, 2]));

        let report = interceptor.turn(NodeId(0)).unwrap();
        assert_eq!(report.cut, UnorderedPair(NodeId(0), NodeId(1)));
        assert_eq!(report.state, TurnState::Stopped);
        assert!(interceptor.network().contains_edge(NodeId(0), NodeId(2)));
    }

    #[test]
    fn fork_beats_earlier_single() {
        // 0 - 1 - (9)
        //  \- 2 - 3 - (7)
        //          \- (8)
        let network = network(10, &[(0, 1), (1, 9), (0, 2), (2, 3), (3, 7), (3, 8)], &[7, 8, 9]);

        let (threat, stats) = Planner::from(&network).plan(NodeId(0)).unwrap();
        assert_eq!(threat, Threat::Fork { node: NodeId(3), exits: (NodeId(7), NodeId(8)) });
        assert_eq!(threat.edge(), UnorderedPair(NodeId(3), NodeId(7)));
        // 0, 1, 2, then 1 and 3 again from the promoted pool
        assert_eq!(stats, SearchStats { expanded: 5, promotions: 1 });
    }

    #[test]
    fn promotion_discards_queued_nodes() {
        // 0 - 1 - (10)
        //  \- 2 - (11)
        //  \- 3 - 4 - (12)
        //          \- (13)
        let links = [(0, 1), (1, 10), (0, 2), (2, 11), (0, 3), (3, 4), (4, 12), (4, 13)];
        let network = network(14, &links, &[10, 11, 12, 13]);

        let (threat, stats) = Planner::from(&network).plan(NodeId(0)).unwrap();
        // 1 and 2 replace the queue [1, 2, 3], so 3 and the fork behind it are never expanded
        assert_eq!(threat, Threat::Single { node: NodeId(1), exit: NodeId(10) });
        assert_eq!(stats, SearchStats { expanded: 3, promotions: 1 });
    }

    #[test]
    fn first_single_is_kept() {
        // 0 - 1 - (5)
        //  \- 2 - 3 - (6)
        let network = network(7, &[(0, 1), (1, 5), (0, 2), (2, 3), (3, 6)], &[5, 6]);

        let (threat, _) = Planner::from(&network).plan(NodeId(0)).unwrap();
        assert_eq!(threat, Threat::Single { node: NodeId(1), exit: NodeId(5) });
    }

    #[test]
    fn linked_exits_are_never_expanded() {
        // 0 - 1 - (2) - (3)
        let network = network(4, &[(0, 1), (1, 2), (2, 3)], &[2, 3]);

        let (threat, stats) = Planner::from(&network).plan(NodeId(0)).unwrap();
        assert_eq!(threat, Threat::Single { node: NodeId(1), exit: NodeId(2) });
        assert_eq!(stats, SearchStats { expanded: 2, promotions: 0 });
    }

    #[test]
    fn nothing_to_cut() {
        let network = network(3, &[(0, 1), (1, 2)], &[]);

        assert_eq!(Planner::from(&network).plan(NodeId(0)), Err(PlannerFailure::NoThreat { from: NodeId(0) }));

        let mut interceptor = Interceptor::from(network);
        assert_eq!(interceptor.turn(NodeId(0)), Err(InterceptError::Planner(PlannerFailure::NoThreat { from: NodeId(0) })));
        assert_eq!(interceptor.state(), TurnState::Running);
    }

    #[test]
    fn unknown_adversary() {
        let mut interceptor = Interceptor::from(network(2, &[(0, 1)], &[1]));

        assert_eq!(interceptor.turn(NodeId(42)), Err(InterceptError::Lookup(LookupError::UnknownNode(NodeId(42)))));
    }

    #[test]
    fn same_game_same_cuts() {
        let links = [(0, 1), (1, 2), (2, 3), (1, 4), (4, 5), (4, 6)];
        let positions = ids(&[0, 1, 4]);

        let cuts = || {
            let mut interceptor = Interceptor::from(network(7, &links, &[3, 5, 6]));
            positions.iter()
                .map(|position| format_cut(&interceptor.turn(*position).unwrap().cut))
                .collect::<Vec<_>>()
        };

        assert_eq!(cuts(), vec!["4 5", "2 3", "4 6"]);
        assert_eq!(cuts(), cuts());
    }

    #[test]
    fn read_level_and_positions() {
        let mut reader = LineReader::new("4 3 1\n0 1\n1 2\n\n2 3\n3\n0\n".as_bytes());

        let level = reader.read_level().unwrap();
        assert_eq!(level, Level {
            node_count: 4,
            links: vec![(NodeId(0), NodeId(1)), (NodeId(1), NodeId(2)), (NodeId(2), NodeId(3))],
            exits: ids(&[3]),
        });
        assert_eq!(level.network().unwrap().edge_count(), 3);

        assert_eq!(reader.read_position().unwrap(), Some(NodeId(0)));
        assert_eq!(reader.read_position().unwrap(), None);
        assert_eq!(reader.line(), 7);
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            read_level("3 2\n".as_bytes()),
            Err(ProtocolError::WrongArity { line: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            read_level("3 x 1\n".as_bytes()),
            Err(ProtocolError::BadInteger { line: 1, ref token }) if token == "x"
        ));
        assert!(matches!(
            read_level("3 2 1\n0 1\n".as_bytes()),
            Err(ProtocolError::UnexpectedEof { expected: "link" })
        ));

        let mut reader = LineReader::new("1 0 0\n2 3\n".as_bytes());
        reader.read_level().unwrap();
        assert!(matches!(
            reader.read_position(),
            Err(ProtocolError::WrongArity { line: 2, expected: 1, found: 2 })
        ));
    }

    #[test]
    fn invalid_level() {
        let level = Level {
            node_count: 2,
            links: vec![(NodeId(0), NodeId(5))],
            exits: vec![],
        };

        assert!(matches!(
            level.network(),
            Err(ProtocolError::InvalidLevel(reasons)) if reasons == vec![BuilderInvalidReason::NodeOutOfBounds(NodeId(5))]
        ));
    }

    #[test]
    fn oversized_level_is_rejected() {
        let level = read_level(format!("{} 0 0\n", usize::MAX).as_bytes()).unwrap();
        assert!(matches!(
            level.network(),
            Err(ProtocolError::InvalidLevel(reasons)) if reasons == vec![BuilderInvalidReason::TooManyNodes(usize::MAX)]
        ));

        let mut builder = NetworkBuilder::with_nodes(NetworkBuilder::MAX_NODES + 1);
        builder.add_link(NodeId(0), NodeId(1));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::TooManyNodes(NetworkBuilder::MAX_NODES + 1)]));

        assert_eq!(NetworkBuilder::with_nodes(NetworkBuilder::MAX_NODES).build().unwrap().node_count(), NetworkBuilder::MAX_NODES);
    }

    #[test]
    fn play_over_the_protocol() {
        let input = "8 3 2\n4 5\n5 6\n5 7\n6\n7\n4\n5\n5\n";
        let mut output = Vec::new();
        let mut seen = Vec::new();

        let interceptor = play(input.as_bytes(), &mut output, |report| seen.push(report.turn)).unwrap();

        // the last position is never read, the game ended on the second turn
        assert_eq!(String::from_utf8(output).unwrap(), "5 6\n5 7\n");
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(interceptor.state(), TurnState::Stopped);
        assert_eq!(interceptor.network().edge_count(), 1);
    }

    #[test]
    fn play_fails_on_unknown_position() {
        let mut output = Vec::new();

        assert!(matches!(
            play("2 1 1\n0 1\n1\n7\n".as_bytes(), &mut output, |_| {}),
            Err(ProtocolError::Intercept(InterceptError::Lookup(LookupError::UnknownNode(NodeId(7)))))
        ));
        assert!(output.is_empty());
    }
}
