/*!

This is the long-form manual for `merit_core` and `meritdays`.

## The weekly program

Every week, staff nominate peers for the work they did on a project. Line managers
and the executive then cast a ballot of up to three picks. The tally decides who
earns home-office days, and the winners pick the dates on which they take them.

## Tallying

Each pick on a counted ballot is one vote for the candidate, so a candidate listed
twice on the same ballot gets two votes. Candidates are sorted by decreasing number
of votes; candidates with the same number of votes stay in the order in which they
first appeared on the ballots.

The first three candidates receive days according to the number of distinct voters
who picked them:

| distinct voters | executive among them | days |
|-----------------|----------------------|------|
| 0 or 1          |                      | 0    |
| 2               |                      | 1    |
| 3 or more       | no                   | 2    |
| 3 or more       | yes                  | 3    |

### `discardOneRandomBallot`

One ballot, chosen at random, is set aside before counting. The summary reports whose
ballot it was.

### `enableExecutiveBonus`

Every pick of the executive receives 1 to 3 extra days, drawn at random. The bonus
applies even to candidates outside the first three, and is cancelled if the ballot of
the executive was the one set aside.

Both options make the outcome random. Pass `randomSeed` in the rules (or `--seed` on
the command line) to replay a session.

## Scheduling

A winner selects as many dates as the days they earned. A selection is rejected if:
- it is empty: `select at least one date`
- one of the dates is a Monday: `Mondays are not allowed`
- two of the dates follow each other: `consecutive days are not allowed`

Dates are calendar dates in the `YYYY-MM-DD` format, without time zone.

## Session files

`meritdays --config session.json` reads a JSON description of the week:

```json
{
  "sessionSettings": { "sessionName": "Week 25", "weekOf": "2024-06-17" },
  "roster": [
    { "id": "ana", "name": "Ana", "role": "manager", "title": "Engineering Manager", "team": "engineering" }
  ],
  "projects": [ { "id": "p1", "name": "Billing revamp" } ],
  "nominations": [
    { "candidate": "bo", "project": "p1", "justification": "Shipped it", "nominatedBy": "cy" }
  ],
  "ballotSources": [
    { "provider": "inline", "ballots": [ { "voter": "ana", "picks": ["bo"] } ] }
  ],
  "rules": { "discardOneRandomBallot": false, "enableExecutiveBonus": false },
  "schedules": [ { "candidate": "bo", "dates": ["2024-06-18"] } ]
}
```

Roles are `member`, `manager`, `executive`, `sysadmin` and `assistant`. Teams are
`engineering`, `product`, `design`, `operations` and `support`.

### Ballot providers

* `inline` the ballots are in the `ballots` field.
* `csv` a CSV file at `filePath`, relative to the session file. One ballot per row, the
  voter in column `voterColumnIndex` (default 1) and picks starting at
  `firstPickColumnIndex` (default 2). Rows before `firstRowIndex` (default 2) are skipped.
  All the indexes start at 1.
* `xlsx` an Excel export of a form, with the same column options and an optional
  `worksheetName` (default: the first sheet).

Empty pick cells are ignored.

*/
